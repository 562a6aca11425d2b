pub mod assessment;
pub mod scaling;
pub mod severity;
