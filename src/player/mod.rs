mod opener;

pub use opener::ExternalOpener;
