pub mod players;
pub mod sweats;
#[cfg(test)]
pub mod testing;
