//! Feature icons.
//!
//! Icon names come from the `caracteristicas_detalhadas[].icone` column and
//! are free text. They resolve against this fixed set; anything unknown gets
//! [`Icon::Circle`].

/// Icons the detail view knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Bed,
    Bath,
    Car,
    Ruler,
    Home,
    Building,
    Trees,
    Waves,
    Dumbbell,
    Shield,
    Flame,
    Snowflake,
    Wifi,
    Sun,
    Sofa,
    Utensils,
    Dog,
    Key,
    Lock,
    Zap,
    Droplets,
    Wind,
    Tv,
    WashingMachine,
    Elevator,
    MapPin,
    Check,
    Star,
    Circle,
}

impl Icon {
    pub const ALL: [Icon; 29] = [
        Icon::Bed,
        Icon::Bath,
        Icon::Car,
        Icon::Ruler,
        Icon::Home,
        Icon::Building,
        Icon::Trees,
        Icon::Waves,
        Icon::Dumbbell,
        Icon::Shield,
        Icon::Flame,
        Icon::Snowflake,
        Icon::Wifi,
        Icon::Sun,
        Icon::Sofa,
        Icon::Utensils,
        Icon::Dog,
        Icon::Key,
        Icon::Lock,
        Icon::Zap,
        Icon::Droplets,
        Icon::Wind,
        Icon::Tv,
        Icon::WashingMachine,
        Icon::Elevator,
        Icon::MapPin,
        Icon::Check,
        Icon::Star,
        Icon::Circle,
    ];

    /// Canonical kebab-case name, also used as the CSS class suffix
    pub fn name(self) -> &'static str {
        match self {
            Icon::Bed => "bed",
            Icon::Bath => "bath",
            Icon::Car => "car",
            Icon::Ruler => "ruler",
            Icon::Home => "home",
            Icon::Building => "building",
            Icon::Trees => "trees",
            Icon::Waves => "waves",
            Icon::Dumbbell => "dumbbell",
            Icon::Shield => "shield",
            Icon::Flame => "flame",
            Icon::Snowflake => "snowflake",
            Icon::Wifi => "wifi",
            Icon::Sun => "sun",
            Icon::Sofa => "sofa",
            Icon::Utensils => "utensils",
            Icon::Dog => "dog",
            Icon::Key => "key",
            Icon::Lock => "lock",
            Icon::Zap => "zap",
            Icon::Droplets => "droplets",
            Icon::Wind => "wind",
            Icon::Tv => "tv",
            Icon::WashingMachine => "washing-machine",
            Icon::Elevator => "elevator",
            Icon::MapPin => "map-pin",
            Icon::Check => "check",
            Icon::Star => "star",
            Icon::Circle => "circle",
        }
    }

    /// Glyph drawn inside the icon container
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Bed => "🛏",
            Icon::Bath => "🛁",
            Icon::Car => "🚗",
            Icon::Ruler => "📐",
            Icon::Home => "🏠",
            Icon::Building => "🏢",
            Icon::Trees => "🌳",
            Icon::Waves => "🌊",
            Icon::Dumbbell => "🏋",
            Icon::Shield => "🛡",
            Icon::Flame => "🔥",
            Icon::Snowflake => "❄",
            Icon::Wifi => "📶",
            Icon::Sun => "☀",
            Icon::Sofa => "🛋",
            Icon::Utensils => "🍴",
            Icon::Dog => "🐕",
            Icon::Key => "🔑",
            Icon::Lock => "🔒",
            Icon::Zap => "⚡",
            Icon::Droplets => "💧",
            Icon::Wind => "💨",
            Icon::Tv => "📺",
            Icon::WashingMachine => "🧺",
            Icon::Elevator => "🛗",
            Icon::MapPin => "📍",
            Icon::Check => "✔",
            Icon::Star => "★",
            Icon::Circle => "●",
        }
    }

    /// Resolve a free-text name. Case, `-`, `_` and spaces are ignored and a
    /// few common alternative names are accepted. Never fails.
    pub fn resolve(name: &str) -> Icon {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "bed" | "beddouble" | "bedsingle" => Icon::Bed,
            "bath" | "bathtub" | "showerhead" | "shower" => Icon::Bath,
            "car" | "carfront" | "parking" | "parkingcircle" | "squareparking" => Icon::Car,
            "ruler" | "maximize" | "maximize2" | "scan" => Icon::Ruler,
            "home" | "house" => Icon::Home,
            "building" | "building2" => Icon::Building,
            "trees" | "tree" | "treepine" | "treedeciduous" | "leaf" => Icon::Trees,
            "waves" | "pool" => Icon::Waves,
            "dumbbell" => Icon::Dumbbell,
            "shield" | "shieldcheck" | "cctv" => Icon::Shield,
            "flame" | "flamekindling" | "fireextinguisher" => Icon::Flame,
            "snowflake" | "airvent" | "thermometersnowflake" => Icon::Snowflake,
            "wifi" => Icon::Wifi,
            "sun" | "sunrise" => Icon::Sun,
            "sofa" | "armchair" => Icon::Sofa,
            "utensils" | "utensilscrossed" | "chefhat" | "cookingpot" => Icon::Utensils,
            "dog" | "pawprint" | "cat" => Icon::Dog,
            "key" | "keyround" => Icon::Key,
            "lock" | "lockkeyhole" => Icon::Lock,
            "zap" | "plug" => Icon::Zap,
            "droplets" | "droplet" => Icon::Droplets,
            "wind" | "fan" => Icon::Wind,
            "tv" | "monitor" => Icon::Tv,
            "washingmachine" => Icon::WashingMachine,
            "elevator" | "arrowupdown" => Icon::Elevator,
            "mappin" | "map" => Icon::MapPin,
            "check" | "checkcircle" | "circlecheck" => Icon::Check,
            "star" | "sparkles" => Icon::Star,
            _ => Icon::Circle,
        }
    }

    pub fn render(self) -> String {
        format!(
            r#"<span class="feature-icon icon-{}" aria-hidden="true">{}</span>"#,
            self.name(),
            self.glyph()
        )
    }
}
