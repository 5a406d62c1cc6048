pub mod pack;

pub use pack::{
    DEFAULT_AUTHOR, PackContent, PackQuery, QueryPack, assemble_pack, default_description,
};
