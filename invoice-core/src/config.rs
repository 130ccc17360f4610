//! Static presentation settings: page geometry and the fixed text printed on
//! every invoice.
//!
//! `InvoiceConfig::default()` carries the deployment values. A TOML file
//! may override any subset of them:
//!
//! ```toml
//! invoice_number = "002"
//!
//! [seller]
//! name = "Example Traders"
//!
//! [page]
//! compress = false
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// A4 width in points.
pub const A4_WIDTH: f64 = 595.2756;
/// A4 height in points.
pub const A4_HEIGHT: f64 = 841.8898;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub seller: SellerConfig,
    pub bank: BankConfig,
    pub page: PageConfig,
    pub declaration: String,
    /// Printed in the metadata line; invoices are not numbered.
    pub invoice_number: String,
    /// Label printed next to money column headers and amounts.
    pub currency: String,
    /// Suggested download name for the rendered document.
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SellerConfig {
    pub name: String,
    pub address: String,
    pub gst_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub name: String,
    pub account_number: String,
    pub ifsc: String,
}

/// Page geometry in points, plus output options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Flate-compress page content streams.
    pub compress: bool,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        InvoiceConfig {
            seller: SellerConfig::default(),
            bank: BankConfig::default(),
            page: PageConfig::default(),
            declaration: "We declare that this invoice shows the actual price of the goods \
                          and that all particulars are true and correct. Complaints, if any, \
                          should be reported within 24 hours."
                .to_string(),
            invoice_number: "001".to_string(),
            currency: "Rs.".to_string(),
            file_name: "invoice.pdf".to_string(),
        }
    }
}

impl Default for SellerConfig {
    fn default() -> Self {
        SellerConfig {
            name: "SHIV BHOLE TRADERS & SERVICE".to_string(),
            address: "L-39,106, Dhanlaxmi Residency, Ambika Park, Lavachha, Valsad, Gujarat"
                .to_string(),
            gst_number: "24AQIPT6888R1ZI".to_string(),
        }
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig {
            name: "HDFC Bank, Silvassa".to_string(),
            account_number: "50200065378797".to_string(),
            ifsc: "HDFC0000074".to_string(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin_left: 50.0,
            margin_right: 50.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            compress: true,
        }
    }
}

impl PageConfig {
    /// Width available between the side margins.
    pub fn frame_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }
}

impl InvoiceConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
