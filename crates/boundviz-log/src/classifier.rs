//! Stateless recognition of the marker lines that structure a solver log.
//!
//! [`classify`] only looks at the line it is given. Whether a marker is
//! meaningful (for example a bounds header outside the root-bounds section)
//! is decided by the [`SectionParser`](crate::parser::SectionParser).

const INSTANCE_BOUNDARY: &str = "@01";
const PARAMETER_FILE: &str = "loaded parameter file";
const READ_PROBLEM: &str = "read problem ";
const ORIGINAL_START: &str = "Original Program statistics:";
const MASTER_START: &str = "Master Program statistics:";
const PRESOLVED_START: &str = "Presolved Problem  :";
const SOLVER_STATUS: &str = "SCIP Status        :";
const PROBLEM_NAME: &str = "  Problem name     :";
const ROOT_BOUNDS: &str = "Root bounds";
const BOUNDS_HEADER: &str = "iter\tpb\tdb";
const PRICING_SUMMARY: &str = "Pricing Summary:";
const VAR_DETAILS: &str = "AddedVarDetails:";
const VAR_HEADER: &str = "VAR: name\tnode\ttime";
const ROOT_NODE: &str = "Root node:";

/// Problem name the solver prints when it has none of its own.
const BLANK_NAME: &str = "BLANK";

/// What a single line announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `@01 ...`: a new instance starts in a concatenated log.
    InstanceBoundary,
    /// `loaded parameter file <path>`.
    ParameterFile { label: String },
    /// `read problem <path>`.
    ReadProblem { name: String },
    OriginalStart,
    /// `Master Program statistics:` or `Presolved Problem  :`.
    OriginalEnd,
    SolverStatus { status: String },
    /// `None` when the line carries no usable name (absent or `BLANK`).
    ProblemName { name: Option<String> },
    RootBoundsStart,
    BoundsHeader { columns: Vec<String> },
    PricingSummary,
    VarDetailsStart,
    /// Variable header columns, without the leading `VAR:` token.
    VarHeader { columns: Vec<String> },
    RootNode,
    /// Anything else: a data row or noise, depending on the section.
    Text,
}

/// Classifies a line (without its line terminator) by prefix, first match wins.
pub fn classify(line: &str) -> Marker {
    if line.starts_with(INSTANCE_BOUNDARY) {
        Marker::InstanceBoundary
    } else if line.starts_with(PARAMETER_FILE) {
        let token = line.split_whitespace().last().unwrap_or_default();
        let token = token.trim_matches(['<', '>']);
        Marker::ParameterFile {
            label: settings_label(token),
        }
    } else if let Some(rest) = line.strip_prefix(READ_PROBLEM) {
        Marker::ReadProblem {
            name: problem_file_name(rest),
        }
    } else if line.starts_with(ORIGINAL_START) {
        Marker::OriginalStart
    } else if line.starts_with(MASTER_START) || line.starts_with(PRESOLVED_START) {
        Marker::OriginalEnd
    } else if line.starts_with(SOLVER_STATUS) {
        let status = line.rsplit(':').next().unwrap_or_default().trim();
        Marker::SolverStatus {
            status: status.to_string(),
        }
    } else if line.starts_with(PROBLEM_NAME) {
        let name = line
            .split_whitespace()
            .nth(3)
            .map(instance_name)
            .filter(|name| name != BLANK_NAME);
        Marker::ProblemName { name }
    } else if line.starts_with(ROOT_BOUNDS) {
        Marker::RootBoundsStart
    } else if line.starts_with(BOUNDS_HEADER) {
        Marker::BoundsHeader {
            columns: line.split_whitespace().map(String::from).collect(),
        }
    } else if line.starts_with(PRICING_SUMMARY) {
        Marker::PricingSummary
    } else if line.starts_with(VAR_DETAILS) {
        Marker::VarDetailsStart
    } else if line.starts_with(VAR_HEADER) {
        Marker::VarHeader {
            columns: line.split_whitespace().skip(1).map(String::from).collect(),
        }
    } else if line.starts_with(ROOT_NODE) {
        Marker::RootNode
    } else {
        Marker::Text
    }
}

/// Derives the settings label from a parameter-file path: final path
/// segment without its extension.
pub fn settings_label(path: &str) -> String {
    split_extension(final_segment(path)).0.to_string()
}

/// Derives the instance name from a problem path.
///
/// Takes the final path segment, strips a compression suffix (`gz`, `z`,
/// any case) together with the extension before it, or exactly one
/// extension otherwise.
pub fn instance_name(path: &str) -> String {
    let (stem, ext) = split_extension(final_segment(path));
    let stem = match ext {
        Some(ext) if ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("z") => {
            split_extension(stem).0
        }
        _ => stem,
    };
    stem.to_string()
}

/// Name of the problem file from the remainder of a `read problem <path>` line.
fn problem_file_name(rest: &str) -> String {
    let path = rest.rsplit('<').next().unwrap_or_default().replace('>', "");
    instance_name(path.trim())
}

fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Splits `name` at its last dot. Leading dots do not start an extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if !name[..idx].chars().all(|c| c == '.') => {
            (&name[..idx], Some(&name[idx + 1..]))
        }
        _ => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_name_strips_compression_and_format() {
        assert_eq!(instance_name("/data/foo.mps.gz"), "foo");
        assert_eq!(instance_name("/data/foo.lp"), "foo");
        assert_eq!(instance_name("/data/foo.lp.Z"), "foo");
        assert_eq!(instance_name("bar.lp.GZ"), "bar");
    }

    #[test]
    fn test_instance_name_keeps_inner_dots() {
        assert_eq!(instance_name("/x/p0201.dec.mps"), "p0201.dec");
        assert_eq!(instance_name("/x/noext"), "noext");
        assert_eq!(instance_name("/x/.hidden"), ".hidden");
    }

    #[test]
    fn test_settings_label() {
        assert_eq!(settings_label("/home/u/configs/aggressive.set"), "aggressive");
        assert_eq!(settings_label("settings/default"), "default");
    }

    #[test]
    fn test_parameter_file_without_directory() {
        assert_eq!(
            classify("loaded parameter file <fast.set>"),
            Marker::ParameterFile { label: "fast".into() }
        );
    }

    #[test]
    fn test_parameter_file_marker() {
        let marker = classify("loaded parameter file </opt/gcg/settings/configs/aggressive.set>");
        assert_eq!(
            marker,
            Marker::ParameterFile {
                label: "aggressive".into()
            }
        );

        let marker = classify("loaded parameter file settings/configs/aggressive.set");
        assert_eq!(
            marker,
            Marker::ParameterFile {
                label: "aggressive".into()
            }
        );
    }

    #[test]
    fn test_read_problem_marker() {
        assert_eq!(
            classify("read problem </data/miplib/10teams.mps.gz>"),
            Marker::ReadProblem {
                name: "10teams".into()
            }
        );
    }

    #[test]
    fn test_problem_name_marker() {
        assert_eq!(
            classify("  Problem name     : /data/foo.mps.gz"),
            Marker::ProblemName {
                name: Some("foo".into())
            }
        );
        assert_eq!(
            classify("  Problem name     : BLANK"),
            Marker::ProblemName { name: None }
        );
    }

    #[test]
    fn test_original_block_markers() {
        assert_eq!(classify("Original Program statistics:"), Marker::OriginalStart);
        assert_eq!(classify("Master Program statistics:"), Marker::OriginalEnd);
        assert_eq!(classify("Presolved Problem  :"), Marker::OriginalEnd);
        assert_eq!(
            classify("SCIP Status        : problem is solved [optimal solution found]"),
            Marker::SolverStatus {
                status: "problem is solved [optimal solution found]".into()
            }
        );
    }

    #[test]
    fn test_header_markers_keep_column_names() {
        assert_eq!(
            classify("iter\tpb\tdb\ttime\tdualdiff"),
            Marker::BoundsHeader {
                columns: ["iter", "pb", "db", "time", "dualdiff"].map(String::from).to_vec()
            }
        );
        assert_eq!(
            classify("VAR: name\tnode\ttime\tsolval"),
            Marker::VarHeader {
                columns: vec!["name".into(), "node".into(), "time".into(), "solval".into()]
            }
        );
    }

    #[test]
    fn test_header_prefix_is_whitespace_sensitive() {
        assert_eq!(classify("iter pb db"), Marker::Text);
        assert_eq!(classify("VAR: name node time"), Marker::Text);
    }

    #[test]
    fn test_section_markers() {
        assert_eq!(classify("Root bounds "), Marker::RootBoundsStart);
        assert_eq!(classify("Pricing Summary:"), Marker::PricingSummary);
        assert_eq!(classify("AddedVarDetails:"), Marker::VarDetailsStart);
        assert_eq!(classify("Root node:\tAdded Vars 12"), Marker::RootNode);
        assert_eq!(classify("@01 /data/foo.mps.gz ==========="), Marker::InstanceBoundary);
        assert_eq!(classify("0\t100.0\t50.0"), Marker::Text);
    }
}
