// Application state for HTTP handlers
use crate::application::materials_service::MaterialsService;
use crate::application::parent_service::ParentService;
use crate::application::student_service::StudentService;
use crate::application::teacher_service::TeacherService;

pub struct AppState {
    pub parent_service: ParentService,
    pub student_service: StudentService,
    pub teacher_service: TeacherService,
    pub materials_service: MaterialsService,
}
