pub mod client;
pub mod patients;
pub mod types;

pub use client::create_client;
pub use patients::{decode_records, fetch_patients, ApiError};
pub use types::{display_id, PatientPage, PatientRecord};
