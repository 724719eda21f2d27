use aim_core::model::GroundingLink;

use super::{ChunkRef, GroundingChunk};

const MAP_FALLBACK_TITLE: &str = "View on Google Maps";
const WEB_FALLBACK_TITLE: &str = "Web Source";

fn usable_uri(chunk: Option<&ChunkRef>) -> Option<(&str, Option<&str>)> {
    let chunk = chunk?;
    let uri = chunk.uri.as_deref().filter(|uri| !uri.trim().is_empty())?;
    let title = chunk.title.as_deref().filter(|title| !title.trim().is_empty());
    Some((uri, title))
}

/// Turn grounding chunks into citations, preserving provider order.
///
/// A chunk with a maps URI becomes a map link even if it also carries a web
/// URI. Chunks with neither are dropped.
#[must_use]
pub fn extract_citations(chunks: &[GroundingChunk]) -> Vec<GroundingLink> {
    chunks
        .iter()
        .filter_map(|chunk| {
            if let Some((uri, title)) = usable_uri(chunk.maps.as_ref()) {
                Some(GroundingLink::map(title.unwrap_or(MAP_FALLBACK_TITLE), uri))
            } else if let Some((uri, title)) = usable_uri(chunk.web.as_ref()) {
                Some(GroundingLink::web(title.unwrap_or(WEB_FALLBACK_TITLE), uri))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aim_core::model::GroundingSource;

    fn chunk_ref(uri: Option<&str>, title: Option<&str>) -> Option<ChunkRef> {
        Some(ChunkRef {
            uri: uri.map(str::to_owned),
            title: title.map(str::to_owned),
        })
    }

    #[test]
    fn maps_win_and_defaults_fill_titles() {
        let chunks = vec![
            GroundingChunk {
                maps: chunk_ref(Some("https://maps.example/a"), None),
                web: chunk_ref(Some("https://web.example/a"), Some("ignored")),
            },
            GroundingChunk {
                maps: None,
                web: chunk_ref(Some("https://web.example/b"), None),
            },
            GroundingChunk {
                maps: chunk_ref(None, Some("no uri")),
                web: None,
            },
            GroundingChunk {
                maps: None,
                web: chunk_ref(Some("https://web.example/c"), Some("Docs")),
            },
        ];

        let links = extract_citations(&chunks);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].source, GroundingSource::Map);
        assert_eq!(links[0].title, "View on Google Maps");
        assert_eq!(links[1].title, "Web Source");
        assert_eq!(links[1].uri, "https://web.example/b");
        assert_eq!(links[2].title, "Docs");
    }

    #[test]
    fn no_chunks_means_no_links() {
        assert!(extract_citations(&[]).is_empty());
        assert!(extract_citations(&[GroundingChunk::default()]).is_empty());
    }
}
