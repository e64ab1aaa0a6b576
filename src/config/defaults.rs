//! Built-in campaign tables: PARSEC workloads run managed vs unmanaged,
//! profiled with `perf stat`.

use crate::domain::catalog::MetricDefinition;
use crate::domain::experiment::Configuration;

pub const WORKLOADS: &[&str] = &["bodytrack", "ferret"];
pub const INSTANCES: &[u32] = &[1, 3, 6, 9, 12];
pub const THREADS: &[u32] = &[1, 4, 8, 12];

/// (name, label, color). The first entry is the baseline.
const CONFIGURATIONS: &[(&str, &str, &str)] = &[
    ("NOBBQ", "Unmanaged", "0.2"),
    ("BBQ", "BBQ Managed", "0.6"),
];

/// (label, display name, description, column, lower is better)
const METRICS: &[(&str, &str, &str, usize, bool)] = &[
    ("ctime", "Time [s]", "Workload completion time [s]", 1, true),
    ("power", "Power [W]", "System power consumption [W]", 2, true),
    ("task-clock", "Ticks", "Task clock ticks", 3, true),
    ("cpu-used", "CPUs utilized", "CPUs utilization", 4, false),
    ("ctx", "Context-Switches", "Total number of context switches", 5, true),
    ("mig", "Migrations", "Total number of CPU migrations", 6, true),
    ("pf", "Page-Faults", "Total number of page faults", 7, true),
    ("cycles", "Cycles", "Total number of CPU cycles", 8, true),
    ("ghz", "GHz", "Effective processor speed", 9, false),
    ("fes", "Front-End Stalls", "Total number of front-end stalled-cycles", 10, true),
    ("fei", "Front-End Idles", "Total number of front-end idle-cycles", 11, true),
    ("bes", "Back-End Stalls", "Total number of back-end stalled-cycles", 12, true),
    ("bei", "Back-End Idles", "Total number of back-end idle-cycles", 13, true),
    ("ins", "Instructions", "Total number of executed instructions", 14, true),
    ("ipc", "IPC", "Effective Instructions-per-Cycles", 15, false),
    ("scpi", "SPC", "Effective Stalled-Cycles-per-Instruction", 16, true),
    ("b", "Branches", "Total number of branches", 17, true),
    ("b-rate", "Branches-Rate", "Effective rate of branch instructions", 18, false),
    ("b-miss", "Branch-miss", "Total number of missed branches", 19, true),
    ("b-miss-rate", "Branch-miss Quota", "Effective percentage of missed branches", 20, true),
];

pub fn configurations() -> Vec<Configuration> {
    CONFIGURATIONS
        .iter()
        .map(|&(name, label, color)| Configuration::new(name, label, color))
        .collect()
}

pub fn metrics() -> Vec<MetricDefinition> {
    METRICS
        .iter()
        .map(
            |&(label, display_name, description, source_column, lower_is_better)| {
                MetricDefinition {
                    label: label.to_string(),
                    display_name: display_name.to_string(),
                    description: description.to_string(),
                    source_column,
                    lower_is_better,
                }
            },
        )
        .collect()
}
