//! Register names of the engine results.

pub const SAMPLING: &str = "sampling";
pub const ENERGY_TOTAL: &str = "energy_total";
pub const ENERGY_COMPARISON: &str = "energy_comparison";
pub const POWER_FACTOR: &str = "power_factor";
pub const POWER_BALANCE_P: &str = "power_balance_p";
pub const POWER_BALANCE_S: &str = "power_balance_s";
pub const VECTOR_IDENTITY: &str = "vector_identity";
pub const FREQUENCY: &str = "frequency";
pub const VOLTAGE_IMBALANCE: &str = "voltage_imbalance";

/// Every result name in the order the engine writes them.
pub const ALL: [&str; 9] = [
    SAMPLING,
    ENERGY_TOTAL,
    ENERGY_COMPARISON,
    POWER_FACTOR,
    POWER_BALANCE_P,
    POWER_BALANCE_S,
    VECTOR_IDENTITY,
    FREQUENCY,
    VOLTAGE_IMBALANCE,
];
