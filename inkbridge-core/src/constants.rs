//! Fixed lookup tables and tuning values shared by the mappers.
//!
//! stat.ink keys do not exist anywhere in the SplatNet payloads, so every
//! translation that is not served by a remote catalog lives here.

// Agent ----------------------------------------------------------------------
pub const AGENT_NAME: &str = "inkbridge";
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const UPLOAD_MODE_VARIABLE: &str = "Upload Mode";
pub const DEFAULT_UPLOAD_MODE: &str = "Manual";
pub const DEFAULT_ENDPOINT: &str = "https://stat.ink";
pub const API_KEY_LEN: usize = 43;

// Endpoints ------------------------------------------------------------------
pub(crate) const PATH_STAGE: &str = "/api/v3/stage";
pub(crate) const PATH_WEAPON: &str = "/api/v3/weapon";
pub(crate) const PATH_SPECIAL: &str = "/api/v3/special";
pub(crate) const PATH_ABILITY: &str = "/api/v3/ability";
pub(crate) const PATH_SALMON_WEAPON: &str = "/api/v3/salmon/weapon";
pub(crate) const PATH_BATTLE_UUIDS: &str = "/api/v3/s3s/uuid-list?lobby=adaptive";
pub(crate) const PATH_SALMON_UUIDS: &str = "/api/v3/salmon/uuid-list";
pub(crate) const PATH_POST_BATTLE: &str = "/api/v3/battle";
pub(crate) const PATH_POST_SALMON: &str = "/api/v3/salmon";
pub(crate) const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

// Identifier namespaces ------------------------------------------------------
pub(crate) const NAMESPACE_TAIL: &str = "b3a2dbf5-2c09-4792-b78c-00b548b70aeb";
pub(crate) const NAMESPACE_FULL: &str = "63941e1c-e32e-4b56-9a1d-f6fbe19ef6e1";
/// `YYYYMMDDThhmmss_` followed by a 36 character uuid.
pub(crate) const ID_TAIL_LEN: usize = 52;

// Versus ---------------------------------------------------------------------
pub(crate) const FEST_OPEN_MODE_IDS: [u64; 2] = [6, 8];
pub(crate) const FEST_CHALLENGE_MODE_ID: u64 = 7;
pub(crate) const TRICOLOR_DEFENSE_ROLE: &str = "DEFENSE";

// Coop -----------------------------------------------------------------------
pub(crate) const COOP_MAX_WAVE: u32 = 3;
pub(crate) const COOP_MAX_WAVE_TEAM_CONTEST: u32 = 5;
pub(crate) const GRADE_POINT_CAP: i32 = 999;
pub(crate) const GRADE_POINT_BAND: i32 = 40;
pub(crate) const LOWEST_GRADE: u64 = 0;
pub(crate) const TEAM_CONTEST_BASE_DANGER: f64 = 60.0;
pub(crate) const UNSPECIFIED_KEY: &str = "unspecified";

/// Grade point change by number of cleared waves.
pub(crate) const GRADE_POINT_DELTA: [(u32, i32); 4] = [(0, -20), (1, -10), (2, 0), (3, 20)];

/// `(players, bonus at >=2x quota, bonus at >=1.5x quota)`.
pub(crate) const TEAM_CONTEST_DANGER_BONUS: [(usize, f64, f64); 4] = [
    (4, 60.0, 30.0),
    (3, 40.0, 20.0),
    (2, 20.0, 5.0),
    (1, 10.0, 5.0),
];

pub(crate) const COOP_EVENT_KEYS: [(u64, &str); 8] = [
    (1, "rush"),
    (2, "goldie_seeking"),
    (3, "griller"),
    (4, "mothership"),
    (5, "fog"),
    (6, "cohock_charge"),
    (7, "giant_tornado"),
    (8, "mudmouth_eruption"),
];

pub(crate) const COOP_TIDE_KEYS: [(u32, &str); 3] = [(0, "low"), (1, "normal"), (2, "high")];

pub(crate) const KING_SALMONID_KEYS: [(u64, &str); 4] = [
    (23, "yokozuna"),
    (24, "tatsu"),
    (25, "jaw"),
    (30, "triumvirate"),
];

/// Special weapons carry no id in coop results; the icon file name is the
/// only stable handle.
pub(crate) const COOP_SPECIAL_HASHES: [(&str, &str); 7] = [
    (
        "bd327d1b64372dedefd32adb28bea62a5b6152d93aada5d9fc4f669a1955d6d4",
        "nicedama",
    ),
    (
        "463eedc60013608666b260c79ac8c352f9795c3d0cce074d3fbbdbd2c054a56d",
        "hopsonar",
    ),
    (
        "fa8d49e8c850ee69f0231976208a913384e73dc0a39e6fb00806f6aa3da8a1ee",
        "megaphone51",
    ),
    (
        "252059408283fbcb69ca9c18b98effd3b8653ab73b7349c42472281e5a1c38f9",
        "jetpack",
    ),
    (
        "680379f8b83e5f9e033b828360827bc2f0e08c34df1abcc23de3d059fe2ac435",
        "kanitank",
    ),
    (
        "0785cb4fe2e2c1a2bbfc6aaf4cfe8ad8694fa58bc1fdb72a03f2ad50c4b0d3de",
        "sameride",
    ),
    (
        "380e541b5bc5e49d77ff1a616f1343aeba01d500fee36aaddf8f09d74bd3d3bc",
        "tripletornado",
    ),
];

/// Icons shown for "random" weapons and specials before they are revealed.
pub(crate) const RANDOM_ICON_HASHES: [&str; 2] = [
    "473fffb2442075078d8bb7125744905abdeae651b6a5b7453ae295582e45f7d1",
    "9d7272733ae2f2282938da17d69f13419a935eef42239132a02fcf37d8678f10",
];

pub(crate) fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}
