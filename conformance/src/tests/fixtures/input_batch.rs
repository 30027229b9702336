//! A small validator input batch covering every verdict path.

/// Six input rows: clean pass, sign-flip failure, second pass with a
/// panel prefix, unresolvable gating token, unresolvable population
/// name, and a level-note row.
pub const INPUT_BATCH: &str = "\
Cell Population Name\tGating Definition
CD8+ T cell\tCD3+,CD8+,CD4-
CD8-positive, alpha-beta T cell\tCD3+,CD8-
T: CD4-positive, alpha-beta T cell & viable\tCD3+,CD4+,CD8-
B cell\tCD19+,XYZ123+
mystery population\tCD3+
NK: NK cell\tCD3-,CD27+
";
