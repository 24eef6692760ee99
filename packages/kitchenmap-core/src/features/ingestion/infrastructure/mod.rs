pub mod google;

pub use google::GooglePlacesClient;
