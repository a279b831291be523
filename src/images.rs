// images.rs — Trailer links and cast pictures for the detail page.
//
// Two small, pure helpers:
//   1. Trailer URLs   → YouTube video id → privacy-friendly embed URL
//   2. Actor names    → ordered list of image URIs to try, ending with a
//                       generated avatar that always exists
//
// The page tries the candidates in order, moving on each time an <img>
// fails to load.

use url::Url;

const IMAGES_DIR: &str = "images";
const AVATAR_ENDPOINT: &str = "https://ui-avatars.com/api/";
const EMBED_ENDPOINT: &str = "https://www.youtube.com/embed/";

/// Actors whose picture file doesn't follow any of the naming patterns.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("samuel l jackson", "Samuel_L_Jackson.jpg"),
    ("robert downey jr", "Robert_Downey_Jr..jpg"),
    ("tj miller", "T.J._Miller.jpg"),
];

// ---------------------------------------------------------------------------
// Trailers
// ---------------------------------------------------------------------------

/// Pull the video id out of a YouTube link.
///
/// Handles `watch?v=<id>`, `youtu.be/<id>` and `/embed/<id>` forms.
pub fn youtube_id(trailer: &str) -> Option<String> {
    let url = Url::parse(trailer).ok()?;

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        if !v.is_empty() {
            return Some(v.into_owned());
        }
    }

    if url.host_str() == Some("youtu.be") {
        return url
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    url.path()
        .strip_prefix("/embed/")
        .and_then(|rest| rest.split('/').next())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn embed_url(video_id: &str) -> String {
    format!(
        "{EMBED_ENDPOINT}{video_id}?modestbranding=1&rel=0&iv_load_policy=3&playsinline=1"
    )
}

/// Embed URL for a movie's trailer field, if it points at YouTube.
pub fn trailer_embed(trailer: Option<&str>) -> Option<String> {
    trailer.and_then(youtube_id).map(|id| embed_url(&id))
}

// ---------------------------------------------------------------------------
// Cast pictures
// ---------------------------------------------------------------------------

/// "Robert Downey Jr." → "robert downey jr"
fn exception_key(name: &str) -> String {
    name.to_lowercase()
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn underscored(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Lower-case, dot-free, underscore-joined: "Samuel L. Jackson" → "samuel_l_jackson".
pub fn actor_slug(name: &str) -> String {
    underscored(&name.to_lowercase().replace('.', ""))
}

/// Generated initials avatar; used once every picture candidate has failed.
pub fn avatar_url(name: &str) -> String {
    let params = [
        ("name", name),
        ("background", "E50914"),
        ("color", "fff"),
        ("size", "150"),
        ("bold", "true"),
        ("rounded", "true"),
    ];
    match Url::parse_with_params(AVATAR_ENDPOINT, &params) {
        Ok(url) => url.to_string(),
        Err(_) => AVATAR_ENDPOINT.to_string(),
    }
}

/// Image URIs to try for an actor, best guess first. The last element is
/// always the generated avatar, so the list is never empty.
pub fn actor_image_candidates(name: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();

    let key = exception_key(name);
    if let Some((_, file)) = EXCEPTIONS.iter().find(|(k, _)| *k == key) {
        files.push((*file).to_string());
    }
    files.push(format!("{}.jpg", underscored(name)));
    files.push(format!("{}.jpg", actor_slug(name)));
    files.push(format!("{}.jpg", underscored(name).replace('-', "_")));

    let mut candidates: Vec<String> = Vec::with_capacity(files.len() + 1);
    for file in files {
        let uri = format!("{IMAGES_DIR}/{file}");
        if !candidates.contains(&uri) {
            candidates.push(uri);
        }
    }
    candidates.push(avatar_url(name));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_ids_from_common_link_shapes() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=EXeTwQWrcwY&t=10").as_deref(),
            Some("EXeTwQWrcwY")
        );
        assert_eq!(youtube_id("https://youtu.be/YoHD9XEInc0").as_deref(), Some("YoHD9XEInc0"));
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/zSWdZVtXT7E").as_deref(),
            Some("zSWdZVtXT7E")
        );
        assert_eq!(youtube_id("https://vimeo.com/12345"), None);
        assert_eq!(youtube_id("not a url"), None);
    }

    #[test]
    fn embed_url_carries_player_flags() {
        assert_eq!(
            trailer_embed(Some("https://youtu.be/abc")).as_deref(),
            Some("https://www.youtube.com/embed/abc?modestbranding=1&rel=0&iv_load_policy=3&playsinline=1")
        );
        assert_eq!(trailer_embed(None), None);
    }

    #[test]
    fn exception_comes_first_and_avatar_last() {
        let c = actor_image_candidates("Samuel L. Jackson");
        assert_eq!(c[0], "images/Samuel_L_Jackson.jpg");
        assert!(c.contains(&"images/Samuel_L._Jackson.jpg".to_string()));
        assert!(c.contains(&"images/samuel_l_jackson.jpg".to_string()));
        assert!(c.last().unwrap().starts_with("https://ui-avatars.com/api/?name=Samuel"));
    }

    #[test]
    fn candidates_are_deduplicated() {
        let c = actor_image_candidates("Leonardo DiCaprio");
        assert_eq!(
            &c[..2],
            ["images/Leonardo_DiCaprio.jpg", "images/leonardo_dicaprio.jpg"]
        );
        assert_eq!(c.len(), 3);

        let hyphen = actor_image_candidates("Joseph Gordon-Levitt");
        assert!(hyphen.contains(&"images/Joseph_Gordon_Levitt.jpg".to_string()));
    }

    #[test]
    fn avatar_encodes_the_name() {
        let url = avatar_url("Zoë Kravitz");
        assert!(url.starts_with("https://ui-avatars.com/api/?name=Zo%C3%AB+Kravitz&"));
        assert!(url.ends_with("rounded=true"));
    }
}
