//! Logical column vocabulary.
//!
//! Physical headers differ between locales and firmware versions; everything
//! downstream of the resolver addresses data by these fixed names instead.

/// Measurement date text (`dd.mm.yyyy`, `yyyy-mm-dd` or `dd/mm/yyyy`).
pub const DATE: &str = "datum";
/// Measurement time text (`HH:MM:SS[.ffffff]`).
pub const TIME: &str = "cas";

pub const P_TOTAL: &str = "P_total";
pub const S_TOTAL: &str = "S_total";
pub const Q_TOTAL: &str = "Q_total";
pub const PF_TOTAL: &str = "PF_total";
pub const DPF_TOTAL: &str = "DPF_total";

pub const P_L1N: &str = "P_L1N";
pub const P_L2N: &str = "P_L2N";
pub const P_L3N: &str = "P_L3N";

pub const S_L1N: &str = "S_L1N";
pub const S_L2N: &str = "S_L2N";
pub const S_L3N: &str = "S_L3N";

pub const Q_L1N: &str = "Q_L1N";
pub const Q_L2N: &str = "Q_L2N";
pub const Q_L3N: &str = "Q_L3N";

pub const U_L1N: &str = "U_L1N";
pub const U_L2N: &str = "U_L2N";
pub const U_L3N: &str = "U_L3N";

/// Grid frequency in Hz.
pub const FREQUENCY: &str = "F";

pub const THD_V_L1N: &str = "THD_V_L1N";
pub const THD_V_L2N: &str = "THD_V_L2N";
pub const THD_V_L3N: &str = "THD_V_L3N";

pub const THD_A_L1: &str = "THD_A_L1";
pub const THD_A_L2: &str = "THD_A_L2";
pub const THD_A_L3: &str = "THD_A_L3";

/// Derived by the timestamp stage.
pub const TIMESTAMP: &str = "timestamp";
/// Derived by the sampling stage (seconds since the previous row).
pub const DT: &str = "dt";
/// Derived by the power-factor check.
pub const PF_CALC: &str = "PF_calc";

/// Columns without which the pipeline cannot run at all.
pub const REQUIRED: [&str; 4] = [DATE, TIME, P_TOTAL, S_TOTAL];

pub const PHASE_ACTIVE: [&str; 3] = [P_L1N, P_L2N, P_L3N];
pub const PHASE_APPARENT: [&str; 3] = [S_L1N, S_L2N, S_L3N];
pub const PHASE_VOLTAGE: [&str; 3] = [U_L1N, U_L2N, U_L3N];

/// Returns true for columns carried as text rather than parsed as numbers.
pub fn is_text_column(name: &str) -> bool {
    name == DATE || name == TIME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_and_time_are_text() {
        assert!(is_text_column(DATE));
        assert!(is_text_column(TIME));
        assert!(!is_text_column(P_TOTAL));
        assert!(!is_text_column(FREQUENCY));
    }

    #[test]
    fn required_columns_cover_timestamp_and_power() {
        assert_eq!(REQUIRED, ["datum", "cas", "P_total", "S_total"]);
    }
}
