pub mod id_codec;
pub mod identity;
