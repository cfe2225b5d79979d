//! Catalog → CSV writer.

use wordpick_core::word::WordEntry;

/// Column order used for export and for the upload template.
pub const COLUMNS: [&str; 8] =
  ["word", "valence", "energy", "tags", "domains", "types", "synonyms", "lang"];

/// Starter file offered to people preparing an upload.
pub const TEMPLATE: &str = "word,valence,energy,tags,domains,types,synonyms,lang\n\
Calm,1,1,soothe|ground,mindfulness,state,Soothe|Steady,en\n\
Focus,1,2,focus,productivity,action,,en\n";

/// List cells are joined with `|` so they survive the comma delimiter.
const LIST_JOIN: &str = "|";

fn needs_quotes(cell: &str) -> bool {
  cell.contains([',', '"', '\n', '\r'])
    || cell.starts_with(char::is_whitespace)
    || cell.ends_with(char::is_whitespace)
}

fn push_cell(out: &mut String, cell: &str) {
  if needs_quotes(cell) {
    out.push('"');
    out.push_str(&cell.replace('"', "\"\""));
    out.push('"');
  } else {
    out.push_str(cell);
  }
}

/// Serialise `entries` with a header row in [`COLUMNS`] order.
pub fn to_csv(entries: &[WordEntry]) -> String {
  let mut out = COLUMNS.join(",");
  out.push('\n');

  for entry in entries {
    let cells = [
      entry.word.clone(),
      entry.valence.to_string(),
      entry.energy.to_string(),
      entry.tags.join(LIST_JOIN),
      entry.domains.join(LIST_JOIN),
      entry.types.join(LIST_JOIN),
      entry.synonyms.join(LIST_JOIN),
      entry.lang.clone(),
    ];
    for (i, cell) in cells.iter().enumerate() {
      if i > 0 {
        out.push(',');
      }
      push_cell(&mut out, cell);
    }
    out.push('\n');
  }

  out
}
