pub mod gateway;
pub mod raw_pcm;
