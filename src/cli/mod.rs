pub mod doctor;
pub mod models;
