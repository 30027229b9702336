//! Cell Ontology levels table: subclass edges plus the four membrane
//! restriction columns, each a `|`-separated CURIE list.

/// Levels table for the lymphocyte subtree.
///
/// `CD8-positive, alpha-beta T cell` must close to
/// `{CD3e positive, CD8 positive, CD4 negative}`: CD3e comes from the
/// `T cell` ancestor, the rest is asserted directly.
pub const CL_LEVELS: &str = "\
ID\tParents\thas-part\tlacks-part\thigh-amount\tlow-amount
CL:0000542\t\t\t\t\t
CL:0000084\tCL:0000542\tPR:000001889\t\t\t
CL:0000625\tCL:0000084\tPR:000025402\tPR:000001004\t\t
CL:0000624\tCL:0000084\tPR:000001004\tPR:000025402\t\t
CL:0000236\tCL:0000542\tPR:000001002\tPR:000001889\t\t
CL:0000623\tCL:0000542\t\tPR:000001889\t\tPR:000001963
";
