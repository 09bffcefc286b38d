pub mod address;
pub mod catalogue;
pub mod local_directory;
pub mod mode;
pub mod orchestrator;
pub mod registrar;
