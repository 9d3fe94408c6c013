pub mod smoothing;
