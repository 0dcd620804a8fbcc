use std::path::{Path, PathBuf};

use serde::Deserialize;

use saldo_recon::format::{validate_date_format, DEFAULT_DATE_FORMAT};

use crate::error::{Result, StoreError};

pub const CONFIG_FILE_NAME: &str = "saldo.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SaldoConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Where movement records come from. The engine never sees this.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// CSV file or SQLite database file.
    pub path: PathBuf,
    /// Table holding the movements (SQLite only).
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Csv,
    Sqlite,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Source column names. Defaults follow the `movimentacoes` schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub municipality: String,
    pub date: String,
    pub prior_balance: String,
    pub updated_balance: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "id".into(),
            municipality: "municipio".into(),
            date: "data_movimentacao".into(),
            prior_balance: "saldo_anterior_valor".into(),
            updated_balance: "saldo_atualizado_valor".into(),
        }
    }
}

impl ColumnMapping {
    pub fn names(&self) -> [(&'static str, &str); 5] {
        [
            ("id", &self.id),
            ("municipality", &self.municipality),
            ("date", &self.date),
            ("prior_balance", &self.prior_balance),
            ("updated_balance", &self.updated_balance),
        ]
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub date_format: String,
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.into(),
            currency_symbol: "R$".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SaldoConfig {
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: SaldoConfig =
            toml::from_str(input).map_err(|e| StoreError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file. A relative store path resolves
    /// against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&input)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        if config.store.path.is_relative() {
            config.store.path = base_dir.join(&config.store.path);
        }
        log::debug!("loaded config {} ({} store)", path.display(), config.store.kind);
        Ok(config)
    }

    /// `./saldo.toml` if present, else `<config dir>/saldo/saldo.toml`.
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("saldo")
            .join(CONFIG_FILE_NAME)
    }

    pub fn validate(&self) -> Result<()> {
        let store = &self.store;

        if store.path.as_os_str().is_empty() {
            return Err(StoreError::ConfigValidation("store.path must not be empty".into()));
        }

        for (field, name) in store.columns.names() {
            if name.trim().is_empty() {
                return Err(StoreError::ConfigValidation(format!(
                    "store.columns.{field} must not be empty"
                )));
            }
        }

        if store.kind == StoreKind::Sqlite {
            let table = store.table.as_deref().ok_or_else(|| {
                StoreError::ConfigValidation("store.table is required for sqlite stores".into())
            })?;
            if !is_identifier(table) {
                return Err(StoreError::ConfigValidation(format!(
                    "store.table '{table}' is not a plain identifier"
                )));
            }
            for (field, name) in store.columns.names() {
                if !is_identifier(name) {
                    return Err(StoreError::ConfigValidation(format!(
                        "store.columns.{field} '{name}' is not a plain identifier"
                    )));
                }
            }
        }

        validate_date_format(&self.display.date_format)
            .map_err(|e| StoreError::ConfigValidation(format!("display.date_format: {e}")))?;

        Ok(())
    }
}

/// ASCII letters, digits and underscores, not starting with a digit.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
