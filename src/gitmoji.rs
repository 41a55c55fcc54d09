//! Gitmoji shortcode table and substitution.
//!
//! Commit messages written with gitmoji carry `:name:` shortcodes that the
//! WeCom client shows verbatim. Rendered messages are passed through
//! [`trans_to_emoji`] before they are sent.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Shortcode to emoji mapping. Values never contain `:`.
pub static GITMOJI: &[(&str, &str)] = &[
    (":adhesive_bandage:", "\u{1FA79}"),
    (":alembic:", "\u{2697}\u{FE0F}"),
    (":alien:", "\u{1F47D}\u{FE0F}"),
    (":ambulance:", "\u{1F691}\u{FE0F}"),
    (":arrow_down:", "\u{2B07}\u{FE0F}"),
    (":arrow_up:", "\u{2B06}\u{FE0F}"),
    (":art:", "\u{1F3A8}"),
    (":beers:", "\u{1F37B}"),
    (":bento:", "\u{1F371}"),
    (":bookmark:", "\u{1F516}"),
    (":boom:", "\u{1F4A5}"),
    (":bug:", "\u{1F41B}"),
    (":building_construction:", "\u{1F3D7}\u{FE0F}"),
    (":bulb:", "\u{1F4A1}"),
    (":busts_in_silhouette:", "\u{1F465}"),
    (":camera_flash:", "\u{1F4F8}"),
    (":card_file_box:", "\u{1F5C3}\u{FE0F}"),
    (":chart_with_upwards_trend:", "\u{1F4C8}"),
    (":children_crossing:", "\u{1F6B8}"),
    (":clown_face:", "\u{1F921}"),
    (":coffin:", "\u{26B0}\u{FE0F}"),
    (":construction:", "\u{1F6A7}"),
    (":construction_worker:", "\u{1F477}"),
    (":dizzy:", "\u{1F4AB}"),
    (":egg:", "\u{1F95A}"),
    (":fire:", "\u{1F525}"),
    (":globe_with_meridians:", "\u{1F310}"),
    (":goal_net:", "\u{1F945}"),
    (":green_heart:", "\u{1F49A}"),
    (":hammer:", "\u{1F528}"),
    (":heavy_minus_sign:", "\u{2796}"),
    (":heavy_plus_sign:", "\u{2795}"),
    (":iphone:", "\u{1F4F1}"),
    (":label:", "\u{1F3F7}\u{FE0F}"),
    (":lipstick:", "\u{1F484}"),
    (":lock:", "\u{1F512}\u{FE0F}"),
    (":loud_sound:", "\u{1F50A}"),
    (":mag:", "\u{1F50D}\u{FE0F}"),
    (":memo:", "\u{1F4DD}"),
    (":monocle_face:", "\u{1F9D0}"),
    (":mute:", "\u{1F507}"),
    (":necktie:", "\u{1F454}"),
    (":package:", "\u{1F4E6}\u{FE0F}"),
    (":page_facing_up:", "\u{1F4C4}"),
    (":passport_control:", "\u{1F6C2}"),
    (":pencil2:", "\u{270F}\u{FE0F}"),
    (":poop:", "\u{1F4A9}"),
    (":pushpin:", "\u{1F4CC}"),
    (":recycle:", "\u{267B}\u{FE0F}"),
    (":rewind:", "\u{23EA}\u{FE0F}"),
    (":rocket:", "\u{1F680}"),
    (":rotating_light:", "\u{1F6A8}"),
    (":see_no_evil:", "\u{1F648}"),
    (":seedling:", "\u{1F331}"),
    (":sparkles:", "\u{2728}"),
    (":speech_balloon:", "\u{1F4AC}"),
    (":stethoscope:", "\u{1FA7A}"),
    (":tada:", "\u{1F389}"),
    (":test_tube:", "\u{1F9EA}"),
    (":triangular_flag_on_post:", "\u{1F6A9}"),
    (":truck:", "\u{1F69A}"),
    (":twisted_rightwards_arrows:", "\u{1F500}"),
    (":wastebasket:", "\u{1F5D1}\u{FE0F}"),
    (":wheelchair:", "\u{267F}\u{FE0F}"),
    (":white_check_mark:", "\u{2705}"),
    (":wrench:", "\u{1F527}"),
    (":zap:", "\u{26A1}\u{FE0F}"),
];

static GITMOJI_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| GITMOJI.iter().copied().collect());

/// Looks up a single `:name:` shortcode.
pub fn lookup(shortcode: &str) -> Option<&'static str> {
    GITMOJI_MAP.get(shortcode).copied()
}

/// Replaces every known `:name:` shortcode in `content` with its emoji.
///
/// Single left-to-right pass. A colon that does not open a known shortcode is
/// copied through and may still close or open the next candidate, so
/// `"a:b:bug:"` becomes `"a:b🐛"`.
pub fn trans_to_emoji(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let replaced = candidate[1..]
            .find(':')
            .map(|end| &candidate[..end + 2])
            .and_then(|code| lookup(code).map(|emoji| (code.len(), emoji)));

        match replaced {
            Some((len, emoji)) => {
                out.push_str(emoji);
                rest = &candidate[len..];
            }
            None => {
                out.push(':');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
