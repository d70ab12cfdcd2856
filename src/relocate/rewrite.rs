//! Reference rewriting for documents moved into one flat directory

use crate::gmm::model::ModuleMetadata;
use crate::utils::last_url_segment;

const PARENT_TRAVERSAL: &str = "../";
const CURRENT_DIR: &str = "./";

/// Truncate `url` to its final segment when it climbs out of the document's directory,
/// and drop any leading `./` from a sibling reference
///
/// Returns true when the value changed.
fn flatten(url: &mut String) -> bool {
  if url.starts_with(PARENT_TRAVERSAL) {
    let flat = last_url_segment(url).to_string();
    *url = flat;
    return true;
  }

  let mut rest = url.as_str();
  while let Some(stripped) = rest.strip_prefix(CURRENT_DIR) {
    rest = stripped;
  }
  if rest.len() == url.len() {
    return false;
  }
  let flat = rest.to_string();
  *url = flat;
  true
}

/// Rewrite every parent-traversal or `./` reference in `metadata` to a bare filename
///
/// Covers the component url, every attached file url and every `available-at` url.
/// Returns the number of references rewritten.
pub fn flatten_references(metadata: &mut ModuleMetadata) -> usize {
  let mut rewritten = 0;

  if let Some(url) = metadata.component.url.as_mut()
    && flatten(url)
  {
    rewritten += 1;
  }

  for variant in &mut metadata.variants {
    for file in &mut variant.files {
      if flatten(&mut file.url) {
        rewritten += 1;
      }
    }
    if let Some(available_at) = variant.available_at.as_mut()
      && flatten(&mut available_at.url)
    {
      rewritten += 1;
    }
  }

  rewritten
}
