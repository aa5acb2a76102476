pub mod capture;
pub mod controller;
pub mod playback;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;
