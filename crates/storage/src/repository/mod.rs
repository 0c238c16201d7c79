mod catalog;

pub use catalog::CatalogRepository;
