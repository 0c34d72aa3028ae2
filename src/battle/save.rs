//! Battle Card Matcher 進行状況の保存/読み込み。
//!
//! localStorage に 2 つのキーを持つ。
//!
//! - `HIGH_SCORES_KEY`: ベストラン上位 5 件の JSON 配列 `[{time, mistakes, date}]`
//! - `UNLOCKED_KEY`: 解放済みの最大レベル番号（1 始まり、10 進文字列）
//!
//! どちらも読み込みに失敗した場合はエラーを伝播させず、既定値
//! （空リスト / 1）にフォールバックする。次回の書き込みで自然に修復される。

#[cfg(any(target_arch = "wasm32", test))]
use super::levels::{HIGH_SCORE_LIMIT, LEVEL_COUNT};
#[cfg(any(target_arch = "wasm32", test))]
use super::state::{HighScore, Progress};

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const HIGH_SCORES_KEY: &str = "battle-card-matcher-highscores";
#[cfg(target_arch = "wasm32")]
const UNLOCKED_KEY: &str = "battle-card-matcher-unlocked";

/// ベストラン一覧をパースする。
/// 欠損・パース失敗時は空リスト。手で書き換えられた値に備えて並べ直し、5 件に切り詰める。
#[cfg(any(target_arch = "wasm32", test))]
pub fn parse_high_scores(raw: Option<&str>) -> Vec<HighScore> {
    let Some(json) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<HighScore>>(json) {
        Ok(mut scores) => {
            scores.sort_by_key(|s| (s.time, s.mistakes));
            scores.truncate(HIGH_SCORE_LIMIT);
            scores
        }
        Err(_) => Vec::new(),
    }
}

/// 解放済みレベルをパースする。欠損・パース失敗時は 1。範囲外の値は 1..=5 に丸める。
#[cfg(any(target_arch = "wasm32", test))]
pub fn parse_unlocked(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .map_or(1, |n| n.clamp(1, LEVEL_COUNT))
}

/// ベストラン一覧を JSON にする。
#[cfg(any(target_arch = "wasm32", test))]
pub fn encode_high_scores(scores: &[HighScore]) -> Result<String, serde_json::Error> {
    serde_json::to_string(scores)
}

/// 両キーから進行状況を組み立てる。
#[cfg(any(target_arch = "wasm32", test))]
pub fn decode_progress(high_scores: Option<&str>, unlocked: Option<&str>) -> Progress {
    Progress {
        high_scores: parse_high_scores(high_scores),
        unlocked: parse_unlocked(unlocked),
    }
}

/// 記録用の日付文字列。ブラウザではロケール形式の日付、それ以外では "-"。
pub fn today() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::new_0()
            .to_locale_date_string("en-US", &js_sys::Object::new())
            .into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        "-".to_string()
    }
}

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn read_key(storage: &web_sys::Storage, key: &str) -> Option<String> {
    match storage.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Battle Card Matcher: {key} の読み込みに失敗: {e:?}").into(),
            );
            None
        }
    }
}

/// localStorage から進行状況を読み込む。ストレージが使えない場合は既定値。
#[cfg(target_arch = "wasm32")]
pub fn load_progress() -> Progress {
    let Some(storage) = get_storage() else {
        return Progress::default();
    };
    let scores = read_key(&storage, HIGH_SCORES_KEY);
    let unlocked = read_key(&storage, UNLOCKED_KEY);
    let progress = decode_progress(scores.as_deref(), unlocked.as_deref());

    if scores.is_some() && progress.high_scores.is_empty() {
        web_sys::console::warn_1(
            &"Battle Card Matcher: ベストラン記録のパースに失敗（空として扱います）".into(),
        );
    }
    web_sys::console::log_1(
        &format!(
            "Battle Card Matcher: 進行状況を読み込みました (records={}, unlocked={})",
            progress.high_scores.len(),
            progress.unlocked
        )
        .into(),
    );
    progress
}

/// 進行状況を localStorage に保存する。
/// 失敗時はサイレントに無視（コンソールにログ出力）。
#[cfg(target_arch = "wasm32")]
pub fn save_progress(progress: &Progress) {
    let Some(storage) = get_storage() else {
        return;
    };

    match encode_high_scores(&progress.high_scores) {
        Ok(json) => {
            if let Err(e) = storage.set_item(HIGH_SCORES_KEY, &json) {
                web_sys::console::warn_1(
                    &format!("Battle Card Matcher: ベストランの保存に失敗: {e:?}").into(),
                );
            }
        }
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Battle Card Matcher: ベストランのシリアライズに失敗: {e}").into(),
            );
        }
    }

    if let Err(e) = storage.set_item(UNLOCKED_KEY, &progress.unlocked.to_string()) {
        web_sys::console::warn_1(
            &format!("Battle Card Matcher: 解放レベルの保存に失敗: {e:?}").into(),
        );
    }
}
