//! Fault code knowledge base: static DTC table with severity and likely causes.
//!
//! Loaded once into a hash map and read-only afterwards. Lookups are
//! case-insensitive. Codes absent from the table resolve to an "unknown"
//! entry with warning severity.

use std::collections::HashMap;

use oi_protocol::Severity::{Critical, Normal, Warning};
use oi_protocol::{FaultCode, Severity};

/// One knowledge-base entry.
#[derive(Debug, Clone, PartialEq)]
struct KbEntry {
    description: String,
    severity: Severity,
    possible_causes: Vec<String>,
}

/// Immutable DTC lookup table.
#[derive(Debug, Clone)]
pub struct FaultCodeKb {
    entries: HashMap<String, KbEntry>,
}

impl FaultCodeKb {
    /// Knowledge base over the built-in table of common OBD-II codes.
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_CODES.iter().map(|(code, description, severity, causes)| {
            (*code, *description, *severity, causes.to_vec())
        }))
    }

    /// Build a knowledge base from `(code, description, severity, causes)` rows.
    /// Later rows replace earlier ones with the same code.
    pub fn from_entries<'a>(
        rows: impl IntoIterator<Item = (&'a str, &'a str, Severity, Vec<&'a str>)>,
    ) -> Self {
        let entries = rows
            .into_iter()
            .map(|(code, description, severity, causes)| {
                (
                    code.to_uppercase(),
                    KbEntry {
                        description: description.to_string(),
                        severity,
                        possible_causes: causes.into_iter().map(String::from).collect(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Look up a DTC code. Input is case-insensitive.
    pub fn lookup(&self, code: &str) -> Option<FaultCode> {
        let code = code.trim().to_uppercase();
        let entry = self.entries.get(&code)?;
        Some(FaultCode {
            category: FaultCode::parse_category(&code),
            is_generic: FaultCode::is_generic_code(&code),
            description: entry.description.clone(),
            severity: entry.severity,
            possible_causes: entry.possible_causes.clone(),
            code,
        })
    }

    /// Look up a code, falling back to the unknown-code policy entry.
    pub fn resolve(&self, code: &str) -> FaultCode {
        self.lookup(code).unwrap_or_else(|| {
            tracing::warn!(code = %code, "fault code not in knowledge base");
            FaultCode::unknown(code.trim())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FaultCodeKb {
    fn default() -> Self {
        Self::standard()
    }
}

type Row = (&'static str, &'static str, Severity, &'static [&'static str]);

#[rustfmt::skip]
static STANDARD_CODES: &[Row] = &[
    // ===== Powertrain: fuel and air metering =====
    ("P0100", "Mass Air Flow Circuit Malfunction", Warning, &["Dirty MAF sensor", "Air leak", "Wiring issue"]),
    ("P0101", "Mass Air Flow Circuit Range/Performance", Warning, &["Dirty MAF sensor", "Vacuum leak"]),
    ("P0102", "Mass Air Flow Circuit Low Input", Warning, &["Sensor failure", "Wiring open circuit"]),
    ("P0103", "Mass Air Flow Circuit High Input", Warning, &["Sensor failure", "Short circuit"]),
    ("P0104", "Mass Air Flow Circuit Intermittent", Warning, &["Loose connection", "Damaged wiring"]),
    ("P0105", "Manifold Absolute Pressure Circuit Malfunction", Warning, &["MAP sensor failure", "Vacuum leak"]),
    ("P0106", "MAP/Barometric Pressure Circuit Range/Performance", Warning, &["MAP sensor", "Intake leak"]),
    ("P0107", "MAP/Barometric Pressure Circuit Low Input", Warning, &["Short to ground", "Wiring issue"]),
    ("P0108", "MAP/Barometric Pressure Circuit High Input", Warning, &["Open circuit", "Sensor failure"]),
    ("P0110", "Intake Air Temperature Circuit Malfunction", Warning, &["IAT sensor", "Wiring"]),
    ("P0111", "Intake Air Temperature Circuit Range/Performance", Warning, &["IAT sensor location", "Heat soak"]),
    ("P0112", "Intake Air Temperature Circuit Low Input", Warning, &["Short to ground", "Sensor"]),
    ("P0113", "Intake Air Temperature Circuit High Input", Warning, &["Open circuit", "Connector"]),
    ("P0115", "Engine Coolant Temperature Circuit Malfunction", Critical, &["Sensor failure", "Wiring issue"]),
    ("P0116", "Engine Coolant Temperature Circuit Range/Performance", Warning, &["Thermostat stuck", "Sensor drift"]),
    ("P0117", "Engine Coolant Temperature Circuit Low Input", Warning, &["Short to ground", "Sensor failure"]),
    ("P0118", "Engine Coolant Temperature Circuit High Input", Critical, &["Open circuit", "Sensor failure"]),
    ("P0119", "Engine Coolant Temperature Circuit Intermittent", Warning, &["Loose connection"]),
    ("P0120", "Throttle Position Sensor Circuit Malfunction", Critical, &["TPS failure", "Wiring damage"]),
    ("P0121", "Throttle Position Sensor Range/Performance", Warning, &["TPS wear", "Calibration needed"]),
    ("P0122", "Throttle Position Sensor Circuit Low Input", Critical, &["Short to ground"]),
    ("P0123", "Throttle Position Sensor Circuit High Input", Critical, &["Open circuit"]),
    ("P0124", "Throttle Position Sensor Circuit Intermittent", Warning, &["Loose connection", "Worn TPS"]),
    ("P0125", "Insufficient Coolant Temperature for Closed Loop", Warning, &["Thermostat", "ECT sensor"]),
    ("P0130", "O2 Sensor Circuit Malfunction (Bank 1 Sensor 1)", Warning, &["Sensor aging", "Exhaust leak"]),
    ("P0131", "O2 Sensor Circuit Low Voltage (Bank 1 Sensor 1)", Warning, &["Lean condition", "Sensor failure"]),
    ("P0132", "O2 Sensor Circuit High Voltage (Bank 1 Sensor 1)", Warning, &["Rich condition", "Sensor failure"]),
    ("P0133", "O2 Sensor Circuit Slow Response (Bank 1 Sensor 1)", Warning, &["Sensor aging"]),
    ("P0134", "O2 Sensor Circuit No Activity (Bank 1 Sensor 1)", Warning, &["Sensor failure", "Wiring issue"]),
    ("P0135", "O2 Sensor Heater Circuit Malfunction (Bank 1 Sensor 1)", Warning, &["Heater circuit", "Fuse"]),
    ("P0136", "O2 Sensor Circuit Malfunction (Bank 1 Sensor 2)", Warning, &["Downstream sensor"]),
    ("P0137", "O2 Sensor Circuit Low Voltage (Bank 1 Sensor 2)", Warning, &["Lean exhaust", "Sensor"]),
    ("P0138", "O2 Sensor Circuit High Voltage (Bank 1 Sensor 2)", Warning, &["Rich exhaust", "Sensor"]),
    ("P0139", "O2 Sensor Circuit Slow Response (Bank 1 Sensor 2)", Warning, &["Sensor aging"]),
    ("P0140", "O2 Sensor Circuit No Activity (Bank 1 Sensor 2)", Warning, &["Sensor failure"]),
    ("P0141", "O2 Sensor Heater Circuit Malfunction (Bank 1 Sensor 2)", Warning, &["Heater failure"]),
    ("P0150", "O2 Sensor Circuit Malfunction (Bank 2 Sensor 1)", Warning, &["Sensor aging", "Exhaust leak"]),
    ("P0151", "O2 Sensor Circuit Low Voltage (Bank 2 Sensor 1)", Warning, &["Lean condition"]),
    ("P0152", "O2 Sensor Circuit High Voltage (Bank 2 Sensor 1)", Warning, &["Rich condition"]),
    ("P0153", "O2 Sensor Circuit Slow Response (Bank 2 Sensor 1)", Warning, &["Sensor aging"]),
    ("P0154", "O2 Sensor Circuit No Activity (Bank 2 Sensor 1)", Warning, &["Sensor failure"]),
    ("P0155", "O2 Sensor Heater Circuit Malfunction (Bank 2 Sensor 1)", Warning, &["Heater circuit"]),
    ("P0156", "O2 Sensor Circuit Malfunction (Bank 2 Sensor 2)", Warning, &["Downstream sensor"]),
    ("P0157", "O2 Sensor Circuit Low Voltage (Bank 2 Sensor 2)", Warning, &["Sensor failure"]),
    ("P0158", "O2 Sensor Circuit High Voltage (Bank 2 Sensor 2)", Warning, &["Sensor failure"]),
    ("P0169", "Incorrect Fuel Composition", Warning, &["Wrong fuel type", "Contaminated fuel"]),
    ("P0170", "Fuel Trim Malfunction (Bank 1)", Warning, &["Vacuum leak", "Fuel pressure issue"]),
    ("P0171", "System Too Lean (Bank 1)", Warning, &["Vacuum leak", "Low fuel pressure", "MAF issue"]),
    ("P0172", "System Too Rich (Bank 1)", Warning, &["Leaking injector", "High fuel pressure"]),
    ("P0173", "Fuel Trim Malfunction (Bank 2)", Warning, &["Vacuum leak", "Fuel pressure"]),
    ("P0174", "System Too Lean (Bank 2)", Warning, &["Vacuum leak", "Low fuel pressure"]),
    ("P0175", "System Too Rich (Bank 2)", Warning, &["Leaking injector", "High pressure"]),
    ("P0180", "Fuel Temperature Sensor A Circuit", Warning, &["Sensor failure", "Wiring"]),
    ("P0181", "Fuel Temperature Sensor A Range/Performance", Warning, &["Sensor drift"]),
    ("P0182", "Fuel Temperature Sensor A Circuit Low", Warning, &["Short to ground"]),
    ("P0183", "Fuel Temperature Sensor A Circuit High", Warning, &["Open circuit"]),
    ("P0190", "Fuel Rail Pressure Sensor Circuit", Critical, &["Sensor failure", "Wiring"]),
    ("P0191", "Fuel Rail Pressure Sensor Range/Performance", Warning, &["Sensor drift", "Fuel pressure"]),
    ("P0192", "Fuel Rail Pressure Sensor Circuit Low", Warning, &["Short to ground"]),
    ("P0193", "Fuel Rail Pressure Sensor Circuit High", Warning, &["Open circuit"]),
    ("P0194", "Fuel Rail Pressure Sensor Circuit Intermittent", Warning, &["Loose connection"]),

    // ===== Powertrain: fuel and air metering, injector circuits =====
    ("P0200", "Injector Circuit Malfunction", Critical, &["Injector failure", "Wiring", "ECU"]),
    ("P0201", "Injector Circuit Malfunction - Cylinder 1", Critical, &["Injector 1", "Wiring"]),
    ("P0202", "Injector Circuit Malfunction - Cylinder 2", Critical, &["Injector 2", "Wiring"]),
    ("P0203", "Injector Circuit Malfunction - Cylinder 3", Critical, &["Injector 3", "Wiring"]),
    ("P0204", "Injector Circuit Malfunction - Cylinder 4", Critical, &["Injector 4", "Wiring"]),
    ("P0205", "Injector Circuit Malfunction - Cylinder 5", Critical, &["Injector 5", "Wiring"]),
    ("P0206", "Injector Circuit Malfunction - Cylinder 6", Critical, &["Injector 6", "Wiring"]),
    ("P0207", "Injector Circuit Malfunction - Cylinder 7", Critical, &["Injector 7", "Wiring"]),
    ("P0208", "Injector Circuit Malfunction - Cylinder 8", Critical, &["Injector 8", "Wiring"]),
    ("P0218", "Transmission Fluid Over Temperature", Critical, &["Low fluid", "Cooler blockage", "Heavy load"]),
    ("P0219", "Engine Overspeed Condition", Critical, &["Rev limiter issue", "Transmission slip"]),
    ("P0220", "Throttle/Pedal Position Sensor B Circuit", Warning, &["APP sensor B", "Wiring"]),
    ("P0221", "Throttle/Pedal Position Sensor B Range/Performance", Warning, &["Sensor drift"]),
    ("P0222", "Throttle/Pedal Position Sensor B Circuit Low", Critical, &["Short to ground"]),
    ("P0223", "Throttle/Pedal Position Sensor B Circuit High", Critical, &["Open circuit"]),
    ("P0230", "Fuel Pump Primary Circuit Malfunction", Critical, &["Fuel pump relay", "Wiring", "Pump"]),
    ("P0231", "Fuel Pump Secondary Circuit Low", Critical, &["Fuel pump", "Wiring"]),
    ("P0232", "Fuel Pump Secondary Circuit High", Critical, &["Short circuit", "Relay stuck"]),
    ("P0261", "Cylinder 1 Injector Circuit Low", Warning, &["Short to ground", "Injector"]),
    ("P0262", "Cylinder 1 Injector Circuit High", Warning, &["Open circuit", "Injector"]),
    ("P0263", "Cylinder 1 Contribution/Balance", Warning, &["Injector", "Compression"]),
    ("P0264", "Cylinder 2 Injector Circuit Low", Warning, &["Short to ground", "Injector"]),
    ("P0265", "Cylinder 2 Injector Circuit High", Warning, &["Open circuit", "Injector"]),

    // ===== Powertrain: ignition system and misfire =====
    ("P0300", "Random/Multiple Cylinder Misfire Detected", Critical, &["Spark plugs", "Ignition coils", "Fuel injectors"]),
    ("P0301", "Cylinder 1 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0302", "Cylinder 2 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0303", "Cylinder 3 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0304", "Cylinder 4 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0305", "Cylinder 5 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0306", "Cylinder 6 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0307", "Cylinder 7 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0308", "Cylinder 8 Misfire Detected", Critical, &["Spark plug", "Ignition coil", "Injector"]),
    ("P0320", "Ignition/Distributor Engine Speed Input Circuit", Critical, &["CKP sensor", "Wiring"]),
    ("P0321", "Ignition/Distributor Engine Speed Input Range/Performance", Warning, &["CKP sensor"]),
    ("P0322", "Ignition/Distributor Engine Speed Input No Signal", Critical, &["CKP sensor", "Wiring"]),
    ("P0325", "Knock Sensor 1 Circuit (Bank 1 or Single Sensor)", Warning, &["Knock sensor", "Wiring"]),
    ("P0326", "Knock Sensor 1 Range/Performance (Bank 1)", Warning, &["Knock sensor"]),
    ("P0327", "Knock Sensor 1 Circuit Low (Bank 1)", Warning, &["Short to ground"]),
    ("P0328", "Knock Sensor 1 Circuit High (Bank 1)", Warning, &["Open circuit"]),
    ("P0330", "Knock Sensor 2 Circuit (Bank 2)", Warning, &["Knock sensor 2", "Wiring"]),
    ("P0335", "Crankshaft Position Sensor A Circuit", Critical, &["CKP sensor", "Reluctor wheel", "Wiring"]),
    ("P0336", "Crankshaft Position Sensor A Range/Performance", Warning, &["CKP sensor", "Air gap"]),
    ("P0337", "Crankshaft Position Sensor A Circuit Low", Critical, &["Short to ground"]),
    ("P0338", "Crankshaft Position Sensor A Circuit High", Critical, &["Open circuit"]),
    ("P0340", "Camshaft Position Sensor A Circuit (Bank 1 or Single)", Critical, &["CMP sensor", "Timing chain"]),
    ("P0341", "Camshaft Position Sensor A Range/Performance (Bank 1)", Warning, &["CMP sensor", "Timing"]),
    ("P0342", "Camshaft Position Sensor A Circuit Low (Bank 1)", Critical, &["Short to ground"]),
    ("P0343", "Camshaft Position Sensor A Circuit High (Bank 1)", Critical, &["Open circuit"]),
    ("P0345", "Camshaft Position Sensor A Circuit (Bank 2)", Critical, &["CMP sensor B2"]),
    ("P0350", "Ignition Coil Primary/Secondary Circuit", Critical, &["Coil pack", "Wiring", "ECU"]),
    ("P0351", "Ignition Coil A Primary/Secondary Circuit", Critical, &["Coil A", "Wiring"]),
    ("P0352", "Ignition Coil B Primary/Secondary Circuit", Critical, &["Coil B", "Wiring"]),
    ("P0353", "Ignition Coil C Primary/Secondary Circuit", Critical, &["Coil C", "Wiring"]),
    ("P0354", "Ignition Coil D Primary/Secondary Circuit", Critical, &["Coil D", "Wiring"]),

    // ===== Powertrain: auxiliary emission controls =====
    ("P0400", "EGR Flow Malfunction", Warning, &["EGR valve", "Carbon buildup", "Vacuum"]),
    ("P0401", "EGR Flow Insufficient Detected", Warning, &["EGR valve stuck closed", "Carbon buildup"]),
    ("P0402", "EGR Flow Excessive Detected", Warning, &["EGR valve stuck open", "Vacuum leak"]),
    ("P0403", "EGR Circuit Malfunction", Warning, &["EGR solenoid", "Wiring"]),
    ("P0404", "EGR Control Circuit Range/Performance", Warning, &["EGR position sensor"]),
    ("P0405", "EGR Sensor A Circuit Low", Warning, &["Short to ground"]),
    ("P0406", "EGR Sensor A Circuit High", Warning, &["Open circuit"]),
    ("P0410", "Secondary Air Injection System", Warning, &["AIR pump", "Check valve"]),
    ("P0411", "Secondary Air Injection System Incorrect Flow", Warning, &["AIR pump weak", "Blockage"]),
    ("P0420", "Catalyst System Efficiency Below Threshold (Bank 1)", Warning, &["Catalytic converter wear", "O2 sensor issue"]),
    ("P0421", "Warm Up Catalyst Efficiency Below Threshold (Bank 1)", Warning, &["Catalytic converter"]),
    ("P0430", "Catalyst System Efficiency Below Threshold (Bank 2)", Warning, &["Catalytic converter wear"]),
    ("P0440", "Evaporative Emission Control System Malfunction", Normal, &["Gas cap loose", "EVAP leak"]),
    ("P0441", "Evaporative Emission Control System Incorrect Purge Flow", Normal, &["Purge valve"]),
    ("P0442", "Evaporative Emission Control System Leak Detected (small leak)", Normal, &["Small EVAP leak"]),
    ("P0443", "Evaporative Emission Control System Purge Control Valve Circuit", Normal, &["Purge valve circuit"]),
    ("P0444", "Evaporative Emission Control System Purge Control Valve Circuit Open", Normal, &["Open circuit"]),
    ("P0445", "Evaporative Emission Control System Purge Control Valve Circuit Shorted", Normal, &["Short circuit"]),
    ("P0446", "Evaporative Emission Control System Vent Control Circuit", Normal, &["Vent valve"]),
    ("P0447", "Evaporative Emission Control System Vent Control Circuit Open", Normal, &["Open circuit"]),
    ("P0448", "Evaporative Emission Control System Vent Control Circuit Shorted", Normal, &["Short circuit"]),
    ("P0449", "Evaporative Emission Control System Vent Valve/Solenoid Circuit", Normal, &["Vent solenoid"]),
    ("P0450", "Evaporative Emission Control System Pressure Sensor", Normal, &["FTP sensor"]),
    ("P0451", "Evaporative Emission Control System Pressure Sensor Range/Performance", Normal, &["FTP sensor drift"]),
    ("P0452", "Evaporative Emission Control System Pressure Sensor Low", Normal, &["Short to ground"]),
    ("P0453", "Evaporative Emission Control System Pressure Sensor High", Normal, &["Open circuit"]),
    ("P0455", "Evaporative Emission Control System Leak Detected (large leak)", Warning, &["Large EVAP leak", "Gas cap missing"]),
    ("P0456", "Evaporative Emission Control System Leak Detected (very small leak)", Normal, &["Very small EVAP leak"]),

    // ===== Powertrain: vehicle speed, idle control, auxiliary inputs =====
    ("P0500", "Vehicle Speed Sensor Malfunction", Warning, &["VSS failure", "Wiring issue"]),
    ("P0501", "Vehicle Speed Sensor Range/Performance", Warning, &["VSS calibration"]),
    ("P0502", "Vehicle Speed Sensor Circuit Low Input", Warning, &["Short to ground"]),
    ("P0503", "Vehicle Speed Sensor Intermittent/Erratic/High", Warning, &["Loose connection"]),
    ("P0505", "Idle Control System Malfunction", Warning, &["Idle air control valve", "Vacuum leak"]),
    ("P0506", "Idle Control System RPM Lower Than Expected", Warning, &["IAC valve", "Vacuum leak"]),
    ("P0507", "Idle Control System RPM Higher Than Expected", Warning, &["Vacuum leak", "Throttle body dirty"]),
    ("P0510", "Closed Throttle Position Switch", Warning, &["TPS adjustment", "Switch"]),
    ("P0520", "Engine Oil Pressure Sensor/Switch Circuit", Critical, &["Oil pressure sensor", "Wiring"]),
    ("P0521", "Engine Oil Pressure Sensor/Switch Range/Performance", Critical, &["Oil pressure", "Sensor"]),
    ("P0522", "Engine Oil Pressure Sensor/Switch Low Voltage", Critical, &["Low oil pressure", "Sensor"]),
    ("P0523", "Engine Oil Pressure Sensor/Switch High Voltage", Critical, &["Sensor failure", "Wiring"]),
    ("P0530", "A/C Refrigerant Pressure Sensor Circuit", Warning, &["A/C sensor", "Wiring"]),
    ("P0531", "A/C Refrigerant Pressure Sensor Range/Performance", Warning, &["Low refrigerant"]),
    ("P0532", "A/C Refrigerant Pressure Sensor Circuit Low", Warning, &["Short to ground"]),
    ("P0533", "A/C Refrigerant Pressure Sensor Circuit High", Warning, &["Open circuit"]),
    ("P0550", "Power Steering Pressure Sensor Circuit", Warning, &["PSP sensor", "Wiring"]),
    ("P0560", "System Voltage Malfunction", Warning, &["Alternator", "Battery", "Wiring"]),
    ("P0562", "System Voltage Low", Warning, &["Alternator weak", "Battery drain"]),
    ("P0563", "System Voltage High", Warning, &["Alternator overcharging", "Regulator"]),

    // ===== Powertrain: computer and output circuits =====
    ("P0600", "Serial Communication Link Malfunction", Critical, &["ECU communication", "Wiring"]),
    ("P0601", "Internal Control Module Memory Check Sum Error", Critical, &["ECU failure", "Reprogramming needed"]),
    ("P0602", "Control Module Programming Error", Critical, &["ECU programming", "Reflash needed"]),
    ("P0603", "Internal Control Module Keep Alive Memory (KAM) Error", Warning, &["Battery disconnect", "ECU"]),
    ("P0604", "Internal Control Module Random Access Memory (RAM) Error", Critical, &["ECU failure"]),
    ("P0605", "Internal Control Module Read Only Memory (ROM) Error", Critical, &["ECU failure"]),
    ("P0606", "ECM/PCM Processor", Critical, &["ECU internal failure"]),
    ("P0607", "Control Module Performance", Critical, &["ECU performance issue"]),
    ("P0615", "Starter Relay Circuit", Warning, &["Starter relay", "Wiring"]),
    ("P0616", "Starter Relay Circuit Low", Warning, &["Short to ground"]),
    ("P0617", "Starter Relay Circuit High", Warning, &["Open circuit", "Relay stuck"]),
    ("P0620", "Generator Control Circuit", Warning, &["Alternator control", "Wiring"]),
    ("P0625", "Generator Field Terminal Circuit Low", Warning, &["Alternator field"]),
    ("P0626", "Generator Field Terminal Circuit High", Warning, &["Alternator field"]),
    ("P0627", "Fuel Pump A Control Circuit/Open", Critical, &["Fuel pump relay", "Wiring"]),
    ("P0628", "Fuel Pump A Control Circuit Low", Critical, &["Short to ground"]),
    ("P0629", "Fuel Pump A Control Circuit High", Critical, &["Open circuit"]),
    ("P0650", "Malfunction Indicator Lamp (MIL) Control Circuit", Warning, &["MIL bulb", "Wiring"]),

    // ===== Powertrain: transmission =====
    ("P0700", "Transmission Control System Malfunction", Warning, &["TCM issue", "Wiring"]),
    ("P0701", "Transmission Control System Range/Performance", Warning, &["TCM performance"]),
    ("P0702", "Transmission Control System Electrical", Warning, &["TCM electrical"]),
    ("P0703", "Brake Switch B Circuit", Warning, &["Brake switch", "Wiring"]),
    ("P0704", "Clutch Switch Input Circuit", Warning, &["Clutch switch"]),
    ("P0705", "Transmission Range Sensor Circuit (PRNDL)", Warning, &["TR sensor", "Adjustment"]),
    ("P0706", "Transmission Range Sensor Range/Performance", Warning, &["TR sensor"]),
    ("P0707", "Transmission Range Sensor Circuit Low", Warning, &["Short to ground"]),
    ("P0708", "Transmission Range Sensor Circuit High", Warning, &["Open circuit"]),
    ("P0710", "Transmission Fluid Temperature Sensor Circuit", Warning, &["TFT sensor"]),
    ("P0711", "Transmission Fluid Temperature Sensor Range/Performance", Warning, &["TFT sensor"]),
    ("P0712", "Transmission Fluid Temperature Sensor Circuit Low", Warning, &["Short to ground"]),
    ("P0713", "Transmission Fluid Temperature Sensor Circuit High", Warning, &["Open circuit"]),
    ("P0715", "Input/Turbine Speed Sensor Circuit Malfunction", Warning, &["Speed sensor"]),
    ("P0716", "Input/Turbine Speed Sensor Range/Performance", Warning, &["Speed sensor"]),
    ("P0717", "Input/Turbine Speed Sensor Circuit No Signal", Critical, &["Speed sensor failure"]),
    ("P0720", "Output Speed Sensor Circuit Malfunction", Warning, &["Speed sensor"]),
    ("P0721", "Output Speed Sensor Range/Performance", Warning, &["Speed sensor"]),
    ("P0722", "Output Speed Sensor Circuit No Signal", Critical, &["Speed sensor failure"]),
    ("P0725", "Engine Speed Input Circuit", Warning, &["Engine speed input"]),
    ("P0730", "Incorrect Gear Ratio", Critical, &["Transmission wear", "Low fluid"]),
    ("P0731", "Gear 1 Incorrect Ratio", Critical, &["Transmission 1st gear"]),
    ("P0732", "Gear 2 Incorrect Ratio", Critical, &["Transmission 2nd gear"]),
    ("P0733", "Gear 3 Incorrect Ratio", Critical, &["Transmission 3rd gear"]),
    ("P0734", "Gear 4 Incorrect Ratio", Critical, &["Transmission 4th gear"]),
    ("P0735", "Gear 5 Incorrect Ratio", Critical, &["Transmission 5th gear"]),
    ("P0740", "Torque Converter Clutch Circuit Malfunction", Warning, &["TCC solenoid"]),
    ("P0741", "Torque Converter Clutch Circuit Performance/Stuck Off", Warning, &["TCC stuck off"]),
    ("P0742", "Torque Converter Clutch Circuit Stuck On", Warning, &["TCC stuck on"]),
    ("P0743", "Torque Converter Clutch Circuit Electrical", Warning, &["TCC electrical"]),
    ("P0744", "Torque Converter Clutch Circuit Intermittent", Warning, &["TCC intermittent"]),
    ("P0750", "Shift Solenoid A Malfunction", Warning, &["Shift solenoid A"]),
    ("P0751", "Shift Solenoid A Performance/Stuck Off", Warning, &["Solenoid A stuck"]),
    ("P0752", "Shift Solenoid A Stuck On", Warning, &["Solenoid A stuck on"]),
    ("P0755", "Shift Solenoid B Malfunction", Warning, &["Shift solenoid B"]),
    ("P0756", "Shift Solenoid B Performance/Stuck Off", Warning, &["Solenoid B stuck"]),
    ("P0757", "Shift Solenoid B Stuck On", Warning, &["Solenoid B stuck on"]),
    ("P0760", "Shift Solenoid C Malfunction", Warning, &["Shift solenoid C"]),
    ("P0765", "Shift Solenoid D Malfunction", Warning, &["Shift solenoid D"]),
    ("P0770", "Shift Solenoid E Malfunction", Warning, &["Shift solenoid E"]),
    ("P0775", "Pressure Control Solenoid B", Warning, &["PC solenoid B"]),
    ("P0780", "Shift Malfunction", Critical, &["Transmission shift issue"]),
    ("P0781", "1-2 Shift Malfunction", Critical, &["1-2 shift failure"]),
    ("P0782", "2-3 Shift Malfunction", Critical, &["2-3 shift failure"]),
    ("P0783", "3-4 Shift Malfunction", Critical, &["3-4 shift failure"]),
    ("P0784", "4-5 Shift Malfunction", Critical, &["4-5 shift failure"]),

    // ===== Chassis =====
    ("C0035", "Left Front Wheel Speed Sensor Circuit", Warning, &["Wheel speed sensor", "Wiring"]),
    ("C0040", "Right Front Wheel Speed Sensor Circuit", Warning, &["Wheel speed sensor", "Wiring"]),
    ("C0045", "Left Rear Wheel Speed Sensor Circuit", Warning, &["Wheel speed sensor", "Wiring"]),
    ("C0050", "Right Rear Wheel Speed Sensor Circuit", Warning, &["Wheel speed sensor", "Wiring"]),
    ("C0242", "PCM Indicated TCS Malfunction", Warning, &[]),
    ("C0300", "Rear Speed Sensor Malfunction", Warning, &[]),
    ("C0550", "ECU Malfunction", Critical, &["ABS/ESC module", "Internal failure"]),
    ("C0561", "ABS System Disabled", Critical, &["ABS system fault"]),
    ("C1095", "ABS Hydraulic Pump Motor Circuit", Critical, &["ABS pump", "Motor"]),
    ("C1201", "Engine Control System Malfunction", Warning, &["Engine fault affects ABS"]),
    ("C1234", "Wheel Speed Sensor LF Input Signal Missing", Warning, &["LF sensor", "Wiring"]),
    ("C1235", "Wheel Speed Sensor RF Input Signal Missing", Warning, &["RF sensor", "Wiring"]),
    ("C1236", "Wheel Speed Sensor LR Input Signal Missing", Warning, &["LR sensor", "Wiring"]),
    ("C1237", "Wheel Speed Sensor RR Input Signal Missing", Warning, &["RR sensor", "Wiring"]),

    // ===== Body =====
    ("B0001", "Driver Frontal Stage 1 Deployment Control", Critical, &["Airbag driver side"]),
    ("B0002", "Driver Frontal Stage 2 Deployment Control", Critical, &["Airbag driver side"]),
    ("B0003", "Passenger Frontal Stage 1 Deployment Control", Critical, &["Airbag passenger side"]),
    ("B0100", "Driver Frontal Deployment Loop Resistance Low", Critical, &["Airbag circuit low"]),
    ("B0101", "Driver Frontal Deployment Loop Resistance High", Critical, &["Airbag circuit high"]),
    ("B1000", "ECU Malfunction", Warning, &["Body control module"]),
    ("B1200", "Climate Control Pushbutton Circuit Malfunction", Normal, &["Climate control buttons"]),
    ("B1318", "Battery Voltage Low", Warning, &["Battery", "Charging system"]),
    ("B1325", "Battery Voltage Out Of Range", Warning, &[]),
    ("B1342", "ECU Damaged/Replaced", Warning, &["BCM needs programming"]),
    ("B1600", "PATS Received Incorrect Key Code", Warning, &["Incorrect key", "Immobilizer"]),
    ("B1601", "PATS Received Incorrect Key Code", Warning, &[]),
    ("B2799", "Engine Immobilizer System Malfunction", Critical, &[]),

    // ===== Network =====
    ("U0001", "High Speed CAN Communication Bus", Critical, &["CAN bus failure"]),
    ("U0073", "Control Module Communication Bus Off", Critical, &[]),
    ("U0100", "Lost Communication With ECM/PCM A", Critical, &["ECM communication lost"]),
    ("U0101", "Lost Communication With TCM", Critical, &["TCM communication lost"]),
    ("U0121", "Lost Communication With ABS Module", Critical, &["ABS communication lost"]),
    ("U0140", "Lost Communication With BCM", Warning, &["BCM communication lost"]),
    ("U0155", "Lost Communication With Instrument Panel Cluster", Warning, &["IPC communication lost"]),
    ("U0164", "Lost Communication With HVAC", Normal, &[]),
    ("U0401", "Invalid Data Received From ECM/PCM", Warning, &["Invalid ECM data"]),
    ("U1000", "Class 2 Communication Malfunction", Warning, &["Communication bus error"]),
    ("U1041", "Loss of Electronic Brake Control Module Communication", Critical, &["EBCM lost"]),
    ("U1300", "Low Fuel Level", Normal, &["Low fuel indication"]),
];
