pub mod auth_service;
pub mod authorization_service;
pub mod commissioning_service;
pub mod csv_import_service;
pub mod invitation_service;
pub mod jwt_service;
pub mod seed_service;
pub mod smartsheet_service;
