//! Deciding what a clicked or pasted link is.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
	/// Fetched by the WebUI, then added from its temp path.
	TorrentUrl,
	Magnet,
	NotTorrent,
}

impl LinkKind {
	/// A link is a torrent URL when it has a `/download/` or `/get/` segment
	/// after its first character or ends in `.torrent`; otherwise any
	/// `magnet:` occurrence makes it a magnet.
	pub fn classify(url: &str) -> Self {
		let segment = [url.find("/download/"), url.find("/get/")].into_iter().flatten().min();
		let torrent_suffix = url.len() > ".torrent".len() && url.ends_with(".torrent");

		if segment.is_some_and(|at| at > 0) || torrent_suffix {
			Self::TorrentUrl
		} else if url.contains("magnet:") {
			Self::Magnet
		} else {
			Self::NotTorrent
		}
	}
}
