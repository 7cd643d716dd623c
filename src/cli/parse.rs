use migsize_core::config::SizeUnit;
use migsize_core::policy::SizeBasis;

/// Parse size basis from string
pub fn parse_size_basis(s: &str) -> std::result::Result<SizeBasis, String> {
    s.parse::<SizeBasis>().map_err(|e| e.to_string())
}

/// Parse input size unit from string
pub fn parse_unit(s: &str) -> std::result::Result<SizeUnit, String> {
    s.parse::<SizeUnit>().map_err(|e| e.to_string())
}
