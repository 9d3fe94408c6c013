pub mod controller;
pub mod force_line;
pub mod planet;
