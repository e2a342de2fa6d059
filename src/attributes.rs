//! Style and event attribute collaborators attached to every node.
//!
//! Both property sets are closed: a key outside the enum is not stored and
//! the setter reports [`PropertyOutcome::Ignored`]. Keys are written in
//! snake case in scripts and builders (`stroke_width`, `stroke-width` is
//! accepted too) and emitted with hyphens in markup.

use crate::renderer::svg::escape_xml;

/// Result of setting a property by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOutcome {
    Applied,
    Ignored,
}

/// A closed set of attribute names
pub trait Property: Copy + Eq + 'static {
    /// Snake-case key
    fn key(self) -> &'static str;

    /// Look up a property, accepting `_` or `-` as separator
    fn from_key(key: &str) -> Option<Self>;

    /// Attribute name as written in markup
    fn attribute_name(self) -> String {
        self.key().replace('_', "-")
    }

    /// Value as stored, given the value as set
    fn prepare_value(value: String) -> String {
        value
    }
}

macro_rules! property_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                let key = key.replace('-', "_");
                Self::ALL.iter().copied().find(|p| p.key() == key)
            }
        }
    };
}

property_enum! {
    /// SVG presentation properties
    StyleProperty {
        Class => "class",
        Font => "font",
        FontFamily => "font_family",
        FontSize => "font_size",
        FontSizeAdjust => "font_size_adjust",
        FontStretch => "font_stretch",
        FontStyle => "font_style",
        FontVariant => "font_variant",
        FontWeight => "font_weight",
        Direction => "direction",
        LetterSpacing => "letter_spacing",
        TextDecoration => "text_decoration",
        UnicodeBidi => "unicode_bidi",
        WordSpacing => "word_spacing",
        Clip => "clip",
        Color => "color",
        Cursor => "cursor",
        Display => "display",
        Overflow => "overflow",
        Visibility => "visibility",
        ClipPath => "clip_path",
        ClipRule => "clip_rule",
        Mask => "mask",
        Opacity => "opacity",
        EnableBackground => "enable_background",
        Filter => "filter",
        FloodColor => "flood_color",
        FloodOpacity => "flood_opacity",
        LightingColor => "lighting_color",
        StopColor => "stop_color",
        StopOpacity => "stop_opacity",
        PointerEvents => "pointer_events",
        ColorInterpolation => "color_interpolation",
        ColorInterpolationFilters => "color_interpolation_filters",
        ColorProfile => "color_profile",
        ColorRendering => "color_rendering",
        Fill => "fill",
        FillOpacity => "fill_opacity",
        FillRule => "fill_rule",
        ImageRendering => "image_rendering",
        Marker => "marker",
        MarkerEnd => "marker_end",
        MarkerMid => "marker_mid",
        MarkerStart => "marker_start",
        ShapeRendering => "shape_rendering",
        Stroke => "stroke",
        StrokeDasharray => "stroke_dasharray",
        StrokeDashoffset => "stroke_dashoffset",
        StrokeLinecap => "stroke_linecap",
        StrokeLinejoin => "stroke_linejoin",
        StrokeMiterlimit => "stroke_miterlimit",
        StrokeOpacity => "stroke_opacity",
        StrokeWidth => "stroke_width",
        TextRendering => "text_rendering",
        AlignmentBaseline => "alignment_baseline",
        BaselineShift => "baseline_shift",
        DominantBaseline => "dominant_baseline",
        GlyphOrientationHorizontal => "glyph_orientation_horizontal",
        GlyphOrientationVertical => "glyph_orientation_vertical",
        Kerning => "kerning",
        TextAnchor => "text_anchor",
        WritingMode => "writing_mode",
    }
}

property_enum! {
    /// Event handler attributes
    EventProperty {
        OnFocusIn => "onfocusin",
        OnFocusOut => "onfocusout",
        OnActivate => "onactivate",
        OnClick => "onclick",
        OnMouseDown => "onmousedown",
        OnMouseUp => "onmouseup",
        OnMouseOver => "onmouseover",
        OnMouseMove => "onmousemove",
        OnMouseOut => "onmouseout",
        OnLoad => "onload",
        OnUnload => "onunload",
        OnAbort => "onabort",
        OnError => "onerror",
        OnResize => "onresize",
        OnScroll => "onscroll",
        OnZoom => "onzoom",
        OnBegin => "onbegin",
        OnEnd => "onend",
        OnRepeat => "onrepeat",
    }
}

impl Property for StyleProperty {
    fn key(self) -> &'static str {
        StyleProperty::key(self)
    }

    fn from_key(key: &str) -> Option<Self> {
        StyleProperty::from_key(key)
    }
}

impl Property for EventProperty {
    fn key(self) -> &'static str {
        EventProperty::key(self)
    }

    fn from_key(key: &str) -> Option<Self> {
        EventProperty::from_key(key)
    }

    fn prepare_value(value: String) -> String {
        append_event_argument(value)
    }
}

/// Pass the event object to a handler call: `go()` → `go(evt)`,
/// `go(1)` → `go(1, evt)`, `go` → `go(evt)`
pub fn append_event_argument(mut handler: String) -> String {
    if handler.ends_with("()") {
        handler.insert_str(handler.len() - 1, "evt");
    } else if handler.ends_with(')') {
        handler.insert_str(handler.len() - 1, ", evt");
    } else {
        handler.push_str("(evt)");
    }
    handler
}

/// Ordered property table. Setting a property twice keeps its first
/// position and replaces the value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSet<P> {
    entries: Vec<(P, String)>,
}

impl<P> Default for AttributeSet<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

pub type StyleSet = AttributeSet<StyleProperty>;
pub type EventSet = AttributeSet<EventProperty>;

impl<P: Property> AttributeSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: P, value: impl Into<String>) {
        let value = P::prepare_value(value.into());
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Set a property by key; unknown keys are not stored
    pub fn set_key(&mut self, key: &str, value: impl Into<String>) -> PropertyOutcome {
        match P::from_key(key) {
            Some(property) => {
                self.set(property, value);
                PropertyOutcome::Applied
            }
            None => PropertyOutcome::Ignored,
        }
    }

    pub fn get(&self, property: P) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (P, &str)> {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Markup fragment ` key="value"…`, values escaped
    pub fn attributes(&self) -> String {
        self.entries
            .iter()
            .map(|(p, v)| format!(r#" {}="{}""#, p.attribute_name(), escape_xml(v)))
            .collect()
    }
}
