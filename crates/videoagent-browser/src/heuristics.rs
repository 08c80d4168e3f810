//! DOM heuristics for the Flow page: where the prompt goes and how to send it.
//!
//! The page markup is not stable, so inputs and send buttons are located by
//! ordered selector lists evaluated in the page.

use serde::Deserialize;
use serde_json::json;

use crate::cdp::PageInfo;

/// Prompt input candidates, most specific first.
pub const INPUT_SELECTORS: &[&str] = &[
    "textarea",
    "div[contenteditable='true']",
    "div[role='textbox']",
    "input[type='text']",
    "input:not([type='button']):not([type='submit']):not([type='reset'])",
    "[placeholder*='prompt']",
    "[placeholder*='提示']",
    "[placeholder*='输入']",
    "[placeholder*='describe']",
    "[aria-label*='prompt']",
    "[aria-label*='input']",
    "[data-testid*='input']",
    "[data-testid*='prompt']",
];

/// Send button candidates. The arrow button usually wraps an SVG.
pub const SEND_BUTTON_SELECTORS: &[&str] = &[
    "button[type='submit']",
    "button:has(svg)",
    "button[aria-label*='send']",
    "button[aria-label*='submit']",
    "button[title*='send']",
    "button[title*='submit']",
    "[role='button'][aria-label*='send']",
    "[data-testid*='send']",
    "[data-testid*='submit']",
];

/// Button text or label fragments accepted when no selector matches.
pub const SEND_KEYWORDS: &[&str] = &["send", "submit", "generate", "create", "生成", "发送", "提交"];

/// Shared visibility check injected into the scripts below.
const USABLE_FN: &str = "const usable = (el) => { \
    const r = el.getBoundingClientRect(); \
    const s = window.getComputedStyle(el); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none' && !el.disabled; \
};";

/// Outcome of [`focus_input_script`].
#[derive(Debug, Clone, Deserialize)]
pub struct FocusResult {
    pub found: bool,
    #[serde(default)]
    pub selector: Option<String>,
}

/// Outcome of [`click_send_button_script`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClickResult {
    pub clicked: bool,
    #[serde(default)]
    pub selector: Option<String>,
}

/// Script that focuses and clears the first usable, writable prompt input.
///
/// Evaluates to a [`FocusResult`].
pub fn focus_input_script() -> String {
    format!(
        "(() => {{ \
            const selectors = {selectors}; \
            {usable} \
            for (const sel of selectors) {{ \
                let nodes; \
                try {{ nodes = document.querySelectorAll(sel); }} catch (e) {{ continue; }} \
                for (const el of nodes) {{ \
                    if (!usable(el) || el.readOnly || el.hasAttribute('readonly')) continue; \
                    el.scrollIntoView({{block: 'center'}}); \
                    el.focus(); \
                    el.click(); \
                    if (el.isContentEditable) {{ el.textContent = ''; }} else {{ el.value = ''; }} \
                    el.dispatchEvent(new Event('input', {{bubbles: true}})); \
                    return {{found: true, selector: sel}}; \
                }} \
            }} \
            return {{found: false}}; \
        }})()",
        selectors = json!(INPUT_SELECTORS),
        usable = USABLE_FN,
    )
}

/// Script that reads back the focused element's content.
pub fn input_content_script() -> &'static str {
    "(() => { const el = document.activeElement; \
        if (!el) return ''; \
        return el.isContentEditable ? (el.innerText || '') : (el.value || ''); })()"
}

/// Script that clicks the first usable send button.
///
/// Evaluates to a [`ClickResult`].
pub fn click_send_button_script() -> String {
    format!(
        "(() => {{ \
            const selectors = {selectors}; \
            const keywords = {keywords}; \
            {usable} \
            for (const sel of selectors) {{ \
                let nodes; \
                try {{ nodes = document.querySelectorAll(sel); }} catch (e) {{ continue; }} \
                for (const el of nodes) {{ \
                    if (!usable(el)) continue; \
                    el.scrollIntoView({{block: 'center'}}); \
                    el.click(); \
                    return {{clicked: true, selector: sel}}; \
                }} \
            }} \
            for (const btn of document.querySelectorAll('button')) {{ \
                const label = ((btn.innerText || '') + (btn.getAttribute('aria-label') || '')).toLowerCase(); \
                if (usable(btn) && keywords.some((k) => label.includes(k))) {{ \
                    btn.scrollIntoView({{block: 'center'}}); \
                    btn.click(); \
                    return {{clicked: true, selector: 'button'}}; \
                }} \
            }} \
            return {{clicked: false}}; \
        }})()",
        selectors = json!(SEND_BUTTON_SELECTORS),
        keywords = json!(SEND_KEYWORDS),
        usable = USABLE_FN,
    )
}

/// True when `url` looks like a Flow page.
pub fn is_flow_url(url: &str, keywords: &[String]) -> bool {
    let url = url.to_lowercase();
    keywords
        .iter()
        .any(|keyword| url.contains(&keyword.to_lowercase()))
}

/// First regular tab whose URL matches one of `keywords`.
pub fn pick_flow_tab<'a>(pages: &'a [PageInfo], keywords: &[String]) -> Option<&'a PageInfo> {
    pages
        .iter()
        .filter(|page| page.is_page())
        .find(|page| is_flow_url(&page.url, keywords))
}
