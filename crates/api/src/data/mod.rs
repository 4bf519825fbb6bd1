pub mod sweats;
