mod countries_service;

pub use countries_service::CountriesService;
