//! # Coefficient Tables
//!
//! Read-only reference data for the Fp calculation:
//!
//! - [`period`] - `Ct`, `x` per structure type (ASCE 7-22 Table 12.8-2)
//! - [`systems`] - `R`, `Ω0` per seismic force-resisting system (Table 12.2-1)
//! - [`components`] - `CAR`, `Rpo`, `Ω0p` per component (Tables 13.5-1, 13.6-1)
//!
//! Data is authored as TOML under `fpcalc_core/data/` and embedded at compile
//! time. It is parsed and validated once per process; afterwards the tables are
//! shared immutably, so any number of calculations can read them concurrently.
//!
//! ## Validation
//!
//! Loading fails with [`CalcError::TableData`] when a key appears twice, a
//! coefficient is not a positive finite number, a row uses a key the code does
//! not know, or an enum variant a front end can present has no row.
//!
//! ## Example
//!
//! ```rust
//! use fpcalc_core::tables::{CoefficientTables, ResistingSystem, StructureType};
//!
//! let tables = CoefficientTables::try_bundled().unwrap();
//! let smf = tables.system(ResistingSystem::SpecialSteelMomentFrame).unwrap();
//! assert_eq!(smf.r, 8.0);
//!
//! let period = tables.period(StructureType::SteelMomentFrame).unwrap();
//! assert_eq!(period.ct, 0.028);
//! ```

pub mod components;
pub mod period;
pub mod systems;

pub use components::{
    ComponentCategory, ComponentRecord, ComponentVariant, LegacyComponentFactors,
    SupportLocation,
};
pub use period::{PeriodRecord, StructureType};
pub use systems::{ResistingSystem, ResistingSystemRecord, SystemFamily};

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::{CalcError, CalcResult};
use components::{normalize_subtype, ComponentRow};
use period::PeriodRow;
use systems::SystemRow;

const PERIOD_TABLE: &str = "period";
const SYSTEMS_TABLE: &str = "resisting system";

/// TOML sources for the four tables
#[derive(Debug, Clone, Copy)]
pub struct TableSources<'a> {
    pub period: &'a str,
    pub systems: &'a str,
    pub architectural: &'a str,
    pub mechanical: &'a str,
}

impl TableSources<'static> {
    /// Reference data compiled into the library
    pub const BUNDLED: TableSources<'static> = TableSources {
        period: include_str!("../../data/period.toml"),
        systems: include_str!("../../data/systems.toml"),
        architectural: include_str!("../../data/architectural.toml"),
        mechanical: include_str!("../../data/mechanical.toml"),
    };
}

static BUNDLED: Lazy<CalcResult<CoefficientTables>> =
    Lazy::new(|| CoefficientTables::from_sources(&TableSources::BUNDLED));

/// `[[row]]` array wrapper shared by every table file
#[derive(Debug, Deserialize)]
struct TableFile<R> {
    #[serde(default = "Vec::new")]
    row: Vec<R>,
}

fn parse_rows<R: DeserializeOwned>(table: &str, source: &str) -> CalcResult<Vec<R>> {
    toml::from_str::<TableFile<R>>(source)
        .map(|file| file.row)
        .map_err(|e| CalcError::table_data(table, e.to_string()))
}

fn check_coefficient(table: &str, key: &str, label: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::table_data(
            table,
            format!("'{}' has non-positive {} = {}", key, label, value),
        ));
    }
    Ok(())
}

fn check_unique<'a>(seen: &mut HashSet<String>, table: &str, key: &'a str) -> CalcResult<&'a str> {
    if !seen.insert(key.to_string()) {
        return Err(CalcError::table_data(table, format!("duplicate key '{}'", key)));
    }
    Ok(key)
}

/// Component rows for one category, indexed by normalized key and name
#[derive(Debug, Clone, Default)]
pub struct ComponentTable {
    rows: Vec<ComponentRecord>,
    index: HashMap<String, usize>,
}

impl ComponentTable {
    fn from_rows(category: ComponentCategory, rows: Vec<ComponentRow>) -> CalcResult<Self> {
        let table = category.table_name();
        let mut seen = HashSet::new();
        let mut table_rows = Vec::with_capacity(rows.len());
        let mut index = HashMap::new();

        for row in rows {
            check_unique(&mut seen, table, &row.key)?;
            let record = ComponentRecord::from(row);
            for (label, value) in record.coefficients() {
                check_coefficient(table, &record.key, &label, value)?;
            }

            let position = table_rows.len();
            for alias in [normalize_subtype(&record.key), normalize_subtype(&record.name)] {
                match index.get(&alias) {
                    Some(&existing) if existing != position => {
                        return Err(CalcError::table_data(
                            table,
                            format!("'{}' is ambiguous between two rows", alias),
                        ));
                    }
                    _ => {
                        index.insert(alias, position);
                    }
                }
            }
            table_rows.push(record);
        }

        if table_rows.is_empty() {
            return Err(CalcError::table_data(table, "table has no rows"));
        }

        Ok(ComponentTable {
            rows: table_rows,
            index,
        })
    }

    /// Rows in file order
    pub fn rows(&self) -> &[ComponentRecord] {
        &self.rows
    }

    /// Look up by key or by printed name
    pub fn get(&self, subtype: &str) -> Option<&ComponentRecord> {
        self.index
            .get(&normalize_subtype(subtype))
            .map(|&i| &self.rows[i])
    }
}

/// All four reference tables.
#[derive(Debug, Clone)]
pub struct CoefficientTables {
    periods: HashMap<StructureType, PeriodRecord>,
    systems: HashMap<ResistingSystem, ResistingSystemRecord>,
    architectural: ComponentTable,
    mechanical: ComponentTable,
}

impl CoefficientTables {
    /// The process-wide tables built from [`TableSources::BUNDLED`].
    ///
    /// Parsed on first use; later calls return the same instance.
    pub fn try_bundled() -> CalcResult<&'static CoefficientTables> {
        BUNDLED.as_ref().map_err(Clone::clone)
    }

    /// Parse and validate tables from TOML sources.
    pub fn from_sources(sources: &TableSources<'_>) -> CalcResult<Self> {
        let periods = Self::load_periods(sources.period)?;
        let systems = Self::load_systems(sources.systems)?;
        let architectural = ComponentTable::from_rows(
            ComponentCategory::Architectural,
            parse_rows(
                ComponentCategory::Architectural.table_name(),
                sources.architectural,
            )?,
        )?;
        let mechanical = ComponentTable::from_rows(
            ComponentCategory::MechanicalElectrical,
            parse_rows(
                ComponentCategory::MechanicalElectrical.table_name(),
                sources.mechanical,
            )?,
        )?;

        tracing::debug!(
            periods = periods.len(),
            systems = systems.len(),
            architectural = architectural.rows.len(),
            mechanical = mechanical.rows.len(),
            "coefficient tables loaded"
        );

        Ok(CoefficientTables {
            periods,
            systems,
            architectural,
            mechanical,
        })
    }

    fn load_periods(source: &str) -> CalcResult<HashMap<StructureType, PeriodRecord>> {
        let mut seen = HashSet::new();
        let mut periods = HashMap::new();
        for row in parse_rows::<PeriodRow>(PERIOD_TABLE, source)? {
            let key = check_unique(&mut seen, PERIOD_TABLE, &row.key)?;
            let structure_type = StructureType::from_code(key).ok_or_else(|| {
                CalcError::table_data(PERIOD_TABLE, format!("unknown structure type '{}'", key))
            })?;
            check_coefficient(PERIOD_TABLE, key, "ct", row.ct)?;
            check_coefficient(PERIOD_TABLE, key, "x", row.x)?;
            periods.insert(structure_type, PeriodRecord { ct: row.ct, x: row.x });
        }
        for structure_type in StructureType::ALL {
            if !periods.contains_key(&structure_type) {
                return Err(CalcError::table_data(
                    PERIOD_TABLE,
                    format!("missing row for '{}'", structure_type.code()),
                ));
            }
        }
        Ok(periods)
    }

    fn load_systems(source: &str) -> CalcResult<HashMap<ResistingSystem, ResistingSystemRecord>> {
        let mut seen = HashSet::new();
        let mut systems = HashMap::new();
        for row in parse_rows::<SystemRow>(SYSTEMS_TABLE, source)? {
            let key = check_unique(&mut seen, SYSTEMS_TABLE, &row.key)?;
            let system = ResistingSystem::from_code(key).ok_or_else(|| {
                CalcError::table_data(SYSTEMS_TABLE, format!("unknown system '{}'", key))
            })?;
            check_coefficient(SYSTEMS_TABLE, key, "r", row.r)?;
            check_coefficient(SYSTEMS_TABLE, key, "omega_0", row.omega_0)?;
            systems.insert(
                system,
                ResistingSystemRecord {
                    r: row.r,
                    omega_0: row.omega_0,
                },
            );
        }
        for system in ResistingSystem::ALL {
            if !systems.contains_key(&system) {
                return Err(CalcError::table_data(
                    SYSTEMS_TABLE,
                    format!("missing row for '{}'", system.code()),
                ));
            }
        }
        Ok(systems)
    }

    /// Period parameters for a structure type
    pub fn period(&self, structure_type: StructureType) -> CalcResult<&PeriodRecord> {
        self.periods
            .get(&structure_type)
            .ok_or_else(|| CalcError::unknown_key(PERIOD_TABLE, structure_type.code()))
    }

    /// R and Ω0 for a resisting system
    pub fn system(&self, system: ResistingSystem) -> CalcResult<&ResistingSystemRecord> {
        self.systems
            .get(&system)
            .ok_or_else(|| CalcError::unknown_key(SYSTEMS_TABLE, system.code()))
    }

    /// Component rows for a category
    pub fn components(&self, category: ComponentCategory) -> &ComponentTable {
        match category {
            ComponentCategory::Architectural => &self.architectural,
            ComponentCategory::MechanicalElectrical => &self.mechanical,
        }
    }

    /// A component row by key or printed name
    pub fn component(
        &self,
        category: ComponentCategory,
        subtype: &str,
    ) -> CalcResult<&ComponentRecord> {
        self.components(category)
            .get(subtype)
            .ok_or_else(|| CalcError::unknown_key(category.table_name(), subtype))
    }

    /// Drop a period row, for exercising the missing-data path.
    #[cfg(test)]
    pub(crate) fn without_period(mut self, structure_type: StructureType) -> Self {
        self.periods.remove(&structure_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources_with_period(period: &str) -> TableSources<'_> {
        TableSources {
            period,
            ..TableSources::BUNDLED
        }
    }

    #[test]
    fn test_bundled_tables_load() {
        let tables = CoefficientTables::try_bundled().unwrap();
        for t in StructureType::ALL {
            assert!(tables.period(t).is_ok(), "missing period for {:?}", t);
        }
        for s in ResistingSystem::ALL {
            assert!(tables.system(s).is_ok(), "missing system {:?}", s);
        }
        assert!(!tables.components(ComponentCategory::Architectural).rows().is_empty());
        assert!(!tables.components(ComponentCategory::MechanicalElectrical).rows().is_empty());
    }

    #[test]
    fn test_bundled_is_shared() {
        let a = CoefficientTables::try_bundled().unwrap();
        let b = CoefficientTables::try_bundled().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_period_values() {
        let tables = CoefficientTables::try_bundled().unwrap();
        let concrete = tables.period(StructureType::ConcreteMomentFrame).unwrap();
        assert_eq!(concrete.ct, 0.016);
        assert_eq!(concrete.x, 0.9);
        let other = tables.period(StructureType::AllOther).unwrap();
        assert_eq!(other.ct, 0.02);
        assert_eq!(other.x, 0.75);
    }

    #[test]
    fn test_component_lookup_by_key_and_name() {
        let tables = CoefficientTables::try_bundled().unwrap();
        let by_key = tables
            .component(ComponentCategory::MechanicalElectrical, "lighting-fixture")
            .unwrap();
        let by_name = tables
            .component(ComponentCategory::MechanicalElectrical, "  LIGHTING fixtures ")
            .unwrap();
        assert_eq!(by_key, by_name);
    }

    #[test]
    fn test_unknown_component() {
        let tables = CoefficientTables::try_bundled().unwrap();
        let err = tables
            .component(ComponentCategory::Architectural, "flux capacitor")
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_KEY");
    }

    #[test]
    fn test_component_category_is_respected() {
        let tables = CoefficientTables::try_bundled().unwrap();
        // Lighting fixtures live in the mechanical/electrical table only
        assert!(tables
            .component(ComponentCategory::Architectural, "lighting-fixture")
            .is_err());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let period = r#"
[[row]]
key = "steel-moment-frame"
ct = 0.028
x = 0.8

[[row]]
key = "steel-moment-frame"
ct = 0.03
x = 0.75
"#;
        let err = CoefficientTables::from_sources(&sources_with_period(period)).unwrap_err();
        assert_eq!(err.error_code(), "TABLE_DATA");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let period = r#"
[[row]]
key = "steel-moment-frame"
ct = 0.028
x = 0.8
"#;
        let err = CoefficientTables::from_sources(&sources_with_period(period)).unwrap_err();
        assert!(err.to_string().contains("missing row"));
    }

    #[test]
    fn test_non_positive_coefficient_rejected() {
        let systems = TableSources::BUNDLED
            .systems
            .replacen("r = 5.0", "r = 0.0", 1);
        let sources = TableSources {
            systems: &systems,
            ..TableSources::BUNDLED
        };
        let err = CoefficientTables::from_sources(&sources).unwrap_err();
        assert!(err.to_string().contains("non-positive"));
    }

    #[test]
    fn test_unknown_enum_key_rejected() {
        let period = format!(
            "{}\n[[row]]\nkey = \"log-cabin\"\nct = 0.02\nx = 0.75\n",
            TableSources::BUNDLED.period
        );
        let err = CoefficientTables::from_sources(&sources_with_period(&period)).unwrap_err();
        assert!(err.to_string().contains("log-cabin"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = CoefficientTables::from_sources(&sources_with_period("[[row]\nkey=")).unwrap_err();
        assert_eq!(err.error_code(), "TABLE_DATA");
    }

    #[test]
    fn test_flexible_variants_present() {
        let tables = CoefficientTables::try_bundled().unwrap();
        let wet = tables
            .component(ComponentCategory::MechanicalElectrical, "wet-side-hvac")
            .unwrap();
        assert!(wet.flexible.is_some());
    }
}
