pub mod auth_controller;
pub mod import_controller;
pub mod inspection_controller;
pub mod invitation_controller;
pub mod sync_controller;
pub mod task_controller;
pub mod user_controller;
pub mod vehicle_controller;
