//! HTML attribute names and their JSX spelling

/// HTML attribute name (lower-case) → JSX prop name
pub const JSX_ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    ("accept-charset", "acceptCharset"),
    ("accesskey", "accessKey"),
    ("allowfullscreen", "allowFullScreen"),
    ("autocapitalize", "autoCapitalize"),
    ("autocomplete", "autoComplete"),
    ("autofocus", "autoFocus"),
    ("autoplay", "autoPlay"),
    ("cellpadding", "cellPadding"),
    ("cellspacing", "cellSpacing"),
    ("charset", "charSet"),
    ("class", "className"),
    ("colspan", "colSpan"),
    ("contenteditable", "contentEditable"),
    ("crossorigin", "crossOrigin"),
    ("datetime", "dateTime"),
    ("enctype", "encType"),
    ("enterkeyhint", "enterKeyHint"),
    ("fetchpriority", "fetchPriority"),
    ("for", "htmlFor"),
    ("formaction", "formAction"),
    ("formenctype", "formEncType"),
    ("formmethod", "formMethod"),
    ("formnovalidate", "formNoValidate"),
    ("formtarget", "formTarget"),
    ("frameborder", "frameBorder"),
    ("hreflang", "hrefLang"),
    ("http-equiv", "httpEquiv"),
    ("inputmode", "inputMode"),
    ("itemid", "itemID"),
    ("itemprop", "itemProp"),
    ("itemref", "itemRef"),
    ("itemscope", "itemScope"),
    ("itemtype", "itemType"),
    ("marginheight", "marginHeight"),
    ("marginwidth", "marginWidth"),
    ("maxlength", "maxLength"),
    ("minlength", "minLength"),
    ("novalidate", "noValidate"),
    ("playsinline", "playsInline"),
    ("readonly", "readOnly"),
    ("referrerpolicy", "referrerPolicy"),
    ("rowspan", "rowSpan"),
    ("spellcheck", "spellCheck"),
    ("srcdoc", "srcDoc"),
    ("srclang", "srcLang"),
    ("srcset", "srcSet"),
    ("tabindex", "tabIndex"),
    ("usemap", "useMap"),
    // Event handlers
    ("onblur", "onBlur"),
    ("onchange", "onChange"),
    ("onclick", "onClick"),
    ("oncontextmenu", "onContextMenu"),
    ("ondblclick", "onDoubleClick"),
    ("ondrag", "onDrag"),
    ("ondragend", "onDragEnd"),
    ("ondragenter", "onDragEnter"),
    ("ondragleave", "onDragLeave"),
    ("ondragover", "onDragOver"),
    ("ondragstart", "onDragStart"),
    ("ondrop", "onDrop"),
    ("onerror", "onError"),
    ("onfocus", "onFocus"),
    ("oninput", "onInput"),
    ("onkeydown", "onKeyDown"),
    ("onkeypress", "onKeyPress"),
    ("onkeyup", "onKeyUp"),
    ("onload", "onLoad"),
    ("onmousedown", "onMouseDown"),
    ("onmouseenter", "onMouseEnter"),
    ("onmouseleave", "onMouseLeave"),
    ("onmousemove", "onMouseMove"),
    ("onmouseout", "onMouseOut"),
    ("onmouseover", "onMouseOver"),
    ("onmouseup", "onMouseUp"),
    ("onpaste", "onPaste"),
    ("onreset", "onReset"),
    ("onscroll", "onScroll"),
    ("onsubmit", "onSubmit"),
    ("ontouchend", "onTouchEnd"),
    ("ontouchmove", "onTouchMove"),
    ("ontouchstart", "onTouchStart"),
    ("onwheel", "onWheel"),
    // SVG presentation attributes
    ("clip-path", "clipPath"),
    ("clip-rule", "clipRule"),
    ("color-interpolation-filters", "colorInterpolationFilters"),
    ("dominant-baseline", "dominantBaseline"),
    ("fill-opacity", "fillOpacity"),
    ("fill-rule", "fillRule"),
    ("font-family", "fontFamily"),
    ("font-size", "fontSize"),
    ("font-weight", "fontWeight"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("shape-rendering", "shapeRendering"),
    ("stop-color", "stopColor"),
    ("stop-opacity", "stopOpacity"),
    ("stroke-dasharray", "strokeDasharray"),
    ("stroke-dashoffset", "strokeDashoffset"),
    ("stroke-linecap", "strokeLinecap"),
    ("stroke-linejoin", "strokeLinejoin"),
    ("stroke-miterlimit", "strokeMiterlimit"),
    ("stroke-opacity", "strokeOpacity"),
    ("stroke-width", "strokeWidth"),
    ("text-anchor", "textAnchor"),
    ("vector-effect", "vectorEffect"),
    ("viewbox", "viewBox"),
    ("xlink:href", "xlinkHref"),
    ("xml:lang", "xmlLang"),
    ("xml:space", "xmlSpace"),
];

/// Look up the JSX spelling of an HTML attribute name
pub fn jsx_attribute_name(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    JSX_ATTRIBUTE_NAMES
        .iter()
        .find(|(html, _)| *html == lower)
        .map(|(_, jsx)| *jsx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(jsx_attribute_name("class"), Some("className"));
        assert_eq!(jsx_attribute_name("for"), Some("htmlFor"));
        assert_eq!(jsx_attribute_name("tabindex"), Some("tabIndex"));
        assert_eq!(jsx_attribute_name("colspan"), Some("colSpan"));
        assert_eq!(jsx_attribute_name("onclick"), Some("onClick"));
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(jsx_attribute_name("viewBox"), Some("viewBox"));
        assert_eq!(jsx_attribute_name("TABINDEX"), Some("tabIndex"));
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(jsx_attribute_name("data-id"), None);
        assert_eq!(jsx_attribute_name("aria-label"), None);
        assert_eq!(jsx_attribute_name("href"), None);
    }

    #[test]
    fn test_table_keys_are_lowercase_and_unique() {
        for (i, (html, _)) in JSX_ATTRIBUTE_NAMES.iter().enumerate() {
            assert_eq!(*html, html.to_ascii_lowercase());
            assert!(
                !JSX_ATTRIBUTE_NAMES[i + 1..].iter().any(|(other, _)| other == html),
                "duplicate entry for {html}"
            );
        }
    }
}
