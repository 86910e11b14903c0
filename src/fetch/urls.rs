// src/fetch/urls.rs

/// Root of the Address Base Registry download host.
static BASE_URL: &str = "https://data.address-br.digital.go.jp";

/// Per-city parcel position reference archive.
pub fn parcel_pos_url(city_code: &str) -> String {
    format!(
        "{}/mt_parcel_pos/city/mt_parcel_pos_city{}.csv.zip",
        BASE_URL, city_code
    )
}

/// Per-city parcel master archive.
pub fn parcel_master_url(city_code: &str) -> String {
    format!(
        "{}/mt_parcel/city/mt_parcel_city{}.csv.zip",
        BASE_URL, city_code
    )
}

/// Per-prefecture residential-address position archive.
pub fn rsdt_pos_url(pref_code: &str) -> String {
    format!(
        "{}/mt_rsdtdsp_rsdt_pos/pref/mt_rsdtdsp_rsdt_pos_pref{}.csv.zip",
        BASE_URL, pref_code
    )
}
