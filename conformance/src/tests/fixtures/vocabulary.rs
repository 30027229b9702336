//! Label, synonym, and override tables.

/// Primary Cell Ontology labels, `ID<TAB>Label`.
pub const CELL_LABELS: &str = "\
ID\tLabel
CL:0000542\tlymphocyte
CL:0000084\tT cell
CL:0000625\tCD8-positive, alpha-beta T cell
CL:0000624\tCD4-positive, alpha-beta T cell
CL:0000236\tB cell
CL:0000623\tnatural killer cell
";

/// Cell Ontology exact synonyms, `ID<TAB>Label`.
pub const CELL_SYNONYMS: &str = "\
ID\tLabel
CL:0000625\tCD8+ T cell
CL:0000624\tCD4+ T cell
CL:0000623\tNK cell
CL:0000236\tB lymphocyte
";

/// Primary Protein Ontology labels, `ID<TAB>Label`.
pub const MARKER_LABELS: &str = "\
ID\tLabel
PR:000001889\tT-cell surface glycoprotein CD3 epsilon chain
PR:000025402\tT cell receptor co-receptor CD8
PR:000001004\tT-cell surface glycoprotein CD4
PR:000001002\tB-lymphocyte antigen CD19
PR:000001963\tCD27 antigen
";

/// PRO short labels, `ID<TAB>Label`.
pub const MARKER_SHORTS: &str = "\
ID\tLabel
PR:000001889\tCD3e
PR:000025402\tCD8
PR:000001004\tCD4
PR:000001002\tCD19
PR:000001963\tCD27
";

/// Protein Ontology exact synonyms, `ID<TAB>Label`.
pub const MARKER_SYNONYMS: &str = "\
ID\tLabel
PR:000001889\tCD3 epsilon
PR:000025402\tCD8a
PR:000001004\tT4
PR:000001002\tB4
";

/// Curated override list with the three-column special-gates shape.
pub const SPECIAL_GATES: &str = "\
Ontology ID\tLabel\tSynonyms
PR:000001889\tCD3\tCD3 complex, T3
";

/// Value-scale table mapping reported levels to suffix vocabulary.
pub const VALUE_SCALE: &str = "\
Name\tSymbol\tSynonyms
positive\t+\t
negative\t-\t
high\t++\thi, bright, bri, br
low\t+-\tlo, dim, di
";
