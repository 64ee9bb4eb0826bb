//! Address bar bridge: carries the scan session in the page address so a
//! reload or a shared link lands on the same item.

use reqwest::Url;

use crate::models::ScanParams;
use crate::scan::payload::params_from_url;

pub trait AddressBar: Send {
    fn current(&self) -> Url;

    /// Swaps the address without reloading.
    fn replace(&mut self, url: Url);
}

/// Session parameters present in the address at load time.
pub fn read_session_params<A: AddressBar + ?Sized>(bar: &A) -> Option<ScanParams> {
    params_from_url(&bar.current())
}

/// Rewrites the address to encode `params`. Missing hints are written empty.
pub fn write_session_params<A: AddressBar + ?Sized>(bar: &mut A, params: &ScanParams) {
    let mut url = root_of(&bar.current());
    let query = format!(
        "id={}&cat={}&loc={}",
        urlencoding::encode(&params.id),
        urlencoding::encode(params.category.as_deref().unwrap_or_default()),
        urlencoding::encode(params.location.as_deref().unwrap_or_default()),
    );
    url.set_query(Some(&query));
    bar.replace(url);
}

/// Rewrites the address back to the bare root path.
pub fn clear_session_params<A: AddressBar + ?Sized>(bar: &mut A) {
    let url = root_of(&bar.current());
    bar.replace(url);
}

fn root_of(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

/// Address held in memory; the terminal front end prints it as a share link.
#[derive(Debug, Clone)]
pub struct MemoryAddressBar {
    location: Url,
}

impl MemoryAddressBar {
    pub fn new(location: Url) -> Self {
        Self { location }
    }
}

impl AddressBar for MemoryAddressBar {
    fn current(&self) -> Url {
        self.location.clone()
    }

    fn replace(&mut self, url: Url) {
        tracing::debug!("Address is now {}", url);
        self.location = url;
    }
}
