//! JavaScript snippets that resolve a [`Locator`] inside the page.

use mylist_protocols::Locator;

/// Expression evaluating to the element, or `null`.
fn find_expression(locator: &Locator) -> String {
    match locator {
        Locator::Css(selector) => format!("document.querySelector({})", js_string(selector)),
        Locator::XPath(expr) => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            js_string(expr)
        ),
    }
}

/// Quote a Rust string as a JavaScript string literal.
fn js_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_string()).to_string()
}

fn with_element(locator: &Locator, body: &str, missing: &str) -> String {
    format!(
        "(() => {{ let el; try {{ el = {find}; }} catch (e) {{ el = null; }} if (!el) return {missing}; {body} }})()",
        find = find_expression(locator),
        missing = missing,
        body = body,
    )
}

/// Visibility probe: `null` when absent, else `{visible, x, y}` with the
/// viewport center of the element. Scrolls the element into view first when
/// `reveal` is set.
pub(crate) fn probe(locator: &Locator, reveal: bool) -> String {
    let scroll = if reveal {
        "el.scrollIntoView({block: 'center', inline: 'center'});"
    } else {
        ""
    };
    let body = format!(
        "{scroll} const r = el.getBoundingClientRect(); const s = window.getComputedStyle(el); \
         const visible = r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; \
         return {{ visible, x: r.left + r.width / 2, y: r.top + r.height / 2 }};"
    );
    with_element(locator, &body, "null")
}

/// `true` when the element exists.
pub(crate) fn exists(locator: &Locator) -> String {
    with_element(locator, "return true;", "false")
}

/// Focus the element and clear its current value.
pub(crate) fn focus_and_clear(locator: &Locator) -> String {
    with_element(
        locator,
        "el.focus(); if ('value' in el) { el.value = ''; \
         el.dispatchEvent(new Event('input', { bubbles: true })); } return true;",
        "false",
    )
}

/// Trimmed rendered text of the element, or `null`.
pub(crate) fn text(locator: &Locator) -> String {
    with_element(
        locator,
        "return (el.innerText || el.textContent || '').trim();",
        "null",
    )
}
