use std::collections::BTreeMap;

use tracing::{
  debug,
  info,
  warn
};

use crate::context::AppContext;
use crate::prefs::{
  PreferenceStore,
  SELECTED_THEME_KEY
};

pub const DEFAULT_THEME_ID: &str =
  "light";
/// Class toggled on the body for dark
/// themes.
pub const DARK_MODE_CLASS: &str =
  "dark-theme";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub enum ThemeCategory {
  Bright,
  Dark
}

impl ThemeCategory {
  pub fn all() -> [Self; 2] {
    [Self::Bright, Self::Dark]
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Bright => "Bright Themes",
      | Self::Dark => "Dark Themes"
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      | Self::Bright => "✨",
      | Self::Dark => "🌙"
    }
  }

  pub fn is_dark(self) -> bool {
    self == Self::Dark
  }
}

/// Every color variable the stylesheet
/// reads. A theme has to fill all of
/// them.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Palette {
  pub bg_primary:     &'static str,
  pub bg_secondary:   &'static str,
  pub bg_hover:       &'static str,
  pub text_primary:   &'static str,
  pub text_secondary: &'static str,
  pub header_bg:      &'static str,
  pub footer_bg:      &'static str,
  pub border_color:   &'static str,
  pub shadow_color:   &'static str,
  pub link_color:     &'static str,
  pub link_hover:     &'static str,
  pub btn_primary:    &'static str,
  pub btn_hover:      &'static str,
  pub accent_color:   &'static str,
  pub accent_blue:    &'static str,
  pub accent_orange:  &'static str,
  pub success_color:  &'static str,
  pub warning_color:  &'static str,
  pub danger_color:   &'static str
}

pub const PALETTE_VARIABLES: usize = 19;

impl Palette {
  pub fn variables(
    &self
  ) -> [(&'static str, &'static str);
       PALETTE_VARIABLES] {
    [
      ("--bg-primary", self.bg_primary),
      (
        "--bg-secondary",
        self.bg_secondary
      ),
      ("--bg-hover", self.bg_hover),
      (
        "--text-primary",
        self.text_primary
      ),
      (
        "--text-secondary",
        self.text_secondary
      ),
      ("--header-bg", self.header_bg),
      ("--footer-bg", self.footer_bg),
      (
        "--border-color",
        self.border_color
      ),
      (
        "--shadow-color",
        self.shadow_color
      ),
      ("--link-color", self.link_color),
      ("--link-hover", self.link_hover),
      (
        "--btn-primary",
        self.btn_primary
      ),
      ("--btn-hover", self.btn_hover),
      (
        "--accent-color",
        self.accent_color
      ),
      (
        "--accent-blue",
        self.accent_blue
      ),
      (
        "--accent-orange",
        self.accent_orange
      ),
      (
        "--success-color",
        self.success_color
      ),
      (
        "--warning-color",
        self.warning_color
      ),
      (
        "--danger-color",
        self.danger_color
      )
    ]
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ThemeDefinition {
  pub id:       &'static str,
  pub name:     &'static str,
  pub category: ThemeCategory,
  pub palette:  Palette
}

/// Base palette. Themes that only
/// recolor surfaces, text and accents
/// take the rest from here.
const LIGHT_PALETTE: Palette = Palette {
  bg_primary:     "#f0f2f5",
  bg_secondary:   "#fff",
  bg_hover:       "#e8eaed",
  text_primary:   "#333",
  text_secondary: "#666",
  header_bg:      "#e73aed",
  footer_bg:      "#7C3AED",
  border_color:   "#ccc",
  shadow_color:   "rgba(0, 0, 0, 0.1)",
  link_color:     "#1abc9c",
  link_hover:     "#16a085",
  btn_primary:    "#1abc9c",
  btn_hover:      "#16a085",
  accent_color:   "#e73aed",
  accent_blue:    "#4A90E2",
  accent_orange:  "#ff6b35",
  success_color:  "#27ae60",
  warning_color:  "#f39c12",
  danger_color:   "#e74c3c"
};

pub static THEMES: [ThemeDefinition; 30] = [
  ThemeDefinition {
    id:       "light",
    name:     "Light",
    category: ThemeCategory::Bright,
    palette:  LIGHT_PALETTE
  },
  ThemeDefinition {
    id:       "bright",
    name:     "Neon Bright",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#fffef0",
      bg_secondary:   "#fff9e6",
      bg_hover:       "#fff3c4",
      text_primary:   "#ff1493",
      text_secondary: "#ff69b4",
      header_bg:      "#ff6b9d",
      footer_bg:      "#ffb6c1",
      border_color:   "#ffc0cb",
      shadow_color:   "rgba(255, 107, 157, 0.2)",
      link_color:     "#ff1493",
      link_hover:     "#ff69b4",
      btn_primary:    "#ff6b9d",
      btn_hover:      "#ff1493",
      accent_color:   "#ffff00",
      accent_blue:    "#00b4ff",
      accent_orange:  "#ffa500",
      success_color:  "#ff69b4",
      warning_color:  "#ffa500",
      danger_color:   "#ff0000"
    }
  },
  ThemeDefinition {
    id:       "ocean",
    name:     "Ocean Blue",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#e3f2fd",
      bg_secondary:   "#b3e5fc",
      bg_hover:       "#81d4fa",
      text_primary:   "#0277bd",
      text_secondary: "#01579b",
      header_bg:      "#0277bd",
      footer_bg:      "#00838f",
      border_color:   "#81d4fa",
      shadow_color:   "rgba(2, 119, 189, 0.2)",
      link_color:     "#0277bd",
      link_hover:     "#01579b",
      btn_primary:    "#0277bd",
      btn_hover:      "#01579b",
      accent_color:   "#00acc1",
      accent_blue:    "#039be5",
      accent_orange:  "#ff9800",
      success_color:  "#00897b",
      warning_color:  "#ff9800",
      danger_color:   "#d32f2f"
    }
  },
  ThemeDefinition {
    id:       "forest",
    name:     "Forest Green",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#e8f5e9",
      bg_secondary:   "#c8e6c9",
      bg_hover:       "#a5d6a7",
      text_primary:   "#1b5e20",
      text_secondary: "#2e7d32",
      header_bg:      "#2e7d32",
      footer_bg:      "#1b5e20",
      border_color:   "#a5d6a7",
      shadow_color:   "rgba(46, 125, 50, 0.2)",
      link_color:     "#1b5e20",
      link_hover:     "#2e7d32",
      btn_primary:    "#43a047",
      btn_hover:      "#2e7d32",
      accent_color:   "#558b2f",
      accent_blue:    "#43a047",
      accent_orange:  "#4caf50",
      success_color:  "#689f38",
      warning_color:  "#fbc02d",
      danger_color:   "#d32f2f"
    }
  },
  ThemeDefinition {
    id:       "sunset",
    name:     "Sunset Glow",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#fff3e0",
      bg_secondary:   "#ffe0b2",
      bg_hover:       "#ffcc80",
      text_primary:   "#e65100",
      text_secondary: "#bf360c",
      header_bg:      "#ff6f00",
      footer_bg:      "#e65100",
      border_color:   "#ffb74d",
      shadow_color:   "rgba(230, 81, 0, 0.2)",
      link_color:     "#e65100",
      link_hover:     "#bf360c",
      btn_primary:    "#ff6f00",
      btn_hover:      "#e65100",
      accent_color:   "#ffa000",
      accent_blue:    "#fb8c00",
      accent_orange:  "#ff9800",
      success_color:  "#f57f17",
      warning_color:  "#ff6f00",
      danger_color:   "#d84315"
    }
  },
  ThemeDefinition {
    id:       "peach",
    name:     "Peach",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FFF5EE",
      bg_secondary:   "#FFE4CC",
      bg_hover:       "#FFDAB9",
      text_primary:   "#3E2723",
      text_secondary: "#6D4C41",
      border_color:   "#FFCCBC",
      accent_blue:    "#FF8A65",
      accent_orange:  "#FF7043",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "green",
    name:     "Green",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#F1F8E9",
      bg_secondary:   "#DCEDC8",
      bg_hover:       "#C5E1A5",
      text_primary:   "#1B5E20",
      text_secondary: "#33691E",
      border_color:   "#AED581",
      accent_blue:    "#66BB6A",
      accent_orange:  "#8BC34A",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "red-texture",
    name:     "Red Texture",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FFEBEE",
      bg_secondary:   "#FFCDD2",
      bg_hover:       "#EF9A9A",
      text_primary:   "#B71C1C",
      text_secondary: "#C62828",
      border_color:   "#E57373",
      accent_blue:    "#E53935",
      accent_orange:  "#F44336",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "blue-grid",
    name:     "Blue Grid",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#E3F2FD",
      bg_secondary:   "#BBDEFB",
      bg_hover:       "#90CAF9",
      text_primary:   "#0D47A1",
      text_secondary: "#1565C0",
      border_color:   "#64B5F6",
      accent_blue:    "#2196F3",
      accent_orange:  "#1976D2",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "teal-waves",
    name:     "Teal Waves",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#E0F2F1",
      bg_secondary:   "#B2DFDB",
      bg_hover:       "#80CBC4",
      text_primary:   "#004D40",
      text_secondary: "#00695C",
      border_color:   "#4DB6AC",
      accent_blue:    "#009688",
      accent_orange:  "#00796B",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "burgundy",
    name:     "Burgundy",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FCE4EC",
      bg_secondary:   "#F8BBD0",
      bg_hover:       "#F48FB1",
      text_primary:   "#880E4F",
      text_secondary: "#AD1457",
      border_color:   "#F06292",
      accent_blue:    "#C2185B",
      accent_orange:  "#E91E63",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "beige",
    name:     "Beige",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#EFEBE9",
      bg_secondary:   "#D7CCC8",
      bg_hover:       "#BCAAA4",
      text_primary:   "#3E2723",
      text_secondary: "#4E342E",
      border_color:   "#A1887F",
      accent_blue:    "#6D4C41",
      accent_orange:  "#8D6E63",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "orange",
    name:     "Orange",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FFF3E0",
      bg_secondary:   "#FFE0B2",
      bg_hover:       "#FFCC80",
      text_primary:   "#E65100",
      text_secondary: "#EF6C00",
      border_color:   "#FFB74D",
      accent_blue:    "#FB8C00",
      accent_orange:  "#FF9800",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "yellow",
    name:     "Yellow",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FFFDE7",
      bg_secondary:   "#FFF9C4",
      bg_hover:       "#FFF59D",
      text_primary:   "#F57F17",
      text_secondary: "#F9A825",
      border_color:   "#FFF176",
      accent_blue:    "#FBC02D",
      accent_orange:  "#FDD835",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "gray-dots",
    name:     "Gray Dots",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#ECEFF1",
      bg_secondary:   "#CFD8DC",
      bg_hover:       "#B0BEC5",
      text_primary:   "#263238",
      text_secondary: "#37474F",
      border_color:   "#90A4AE",
      accent_blue:    "#546E7A",
      accent_orange:  "#607D8B",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "blue-curve",
    name:     "Blue Curve",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#E1F5FE",
      bg_secondary:   "#B3E5FC",
      bg_hover:       "#81D4FA",
      text_primary:   "#01579B",
      text_secondary: "#0277BD",
      border_color:   "#4FC3F7",
      accent_blue:    "#039BE5",
      accent_orange:  "#03A9F4",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "teal-dark",
    name:     "Teal Dark",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#E0F7FA",
      bg_secondary:   "#B2EBF2",
      bg_hover:       "#80DEEA",
      text_primary:   "#006064",
      text_secondary: "#00838F",
      border_color:   "#4DD0E1",
      accent_blue:    "#00ACC1",
      accent_orange:  "#00BCD4",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "lime",
    name:     "Lime",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#F9FBE7",
      bg_secondary:   "#F0F4C3",
      bg_hover:       "#E6EE9C",
      text_primary:   "#827717",
      text_secondary: "#9E9D24",
      border_color:   "#DCE775",
      accent_blue:    "#AFB42B",
      accent_orange:  "#CDDC39",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "snow",
    name:     "Snow",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FAFAFA",
      bg_secondary:   "#FFFFFF",
      bg_hover:       "#F5F5F5",
      text_primary:   "#212121",
      text_secondary: "#616161",
      border_color:   "#E0E0E0",
      accent_blue:    "#1976D2",
      accent_orange:  "#FF6F00",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "dark-red",
    name:     "Dark Red",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FFEBEE",
      bg_secondary:   "#EF9A9A",
      bg_hover:       "#E57373",
      text_primary:   "#B71C1C",
      text_secondary: "#C62828",
      border_color:   "#EF5350",
      accent_blue:    "#D32F2F",
      accent_orange:  "#F44336",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "purple",
    name:     "Purple",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#F3E5F5",
      bg_secondary:   "#E1BEE7",
      bg_hover:       "#CE93D8",
      text_primary:   "#4A148C",
      text_secondary: "#6A1B9A",
      border_color:   "#BA68C8",
      accent_blue:    "#8E24AA",
      accent_orange:  "#AB47BC",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "bright-orange",
    name:     "Bright Orange",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#FBE9E7",
      bg_secondary:   "#FFCCBC",
      bg_hover:       "#FFAB91",
      text_primary:   "#BF360C",
      text_secondary: "#D84315",
      border_color:   "#FF8A65",
      accent_blue:    "#F4511E",
      accent_orange:  "#FF5722",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "navy",
    name:     "Navy",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#E3F2FD",
      bg_secondary:   "#90CAF9",
      bg_hover:       "#64B5F6",
      text_primary:   "#0D47A1",
      text_secondary: "#1565C0",
      border_color:   "#42A5F5",
      accent_blue:    "#1976D2",
      accent_orange:  "#2196F3",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "plum",
    name:     "Plum",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#F3E5F5",
      bg_secondary:   "#CE93D8",
      bg_hover:       "#BA68C8",
      text_primary:   "#4A148C",
      text_secondary: "#6A1B9A",
      border_color:   "#AB47BC",
      accent_blue:    "#8E24AA",
      accent_orange:  "#9C27B0",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "cyan-black",
    name:     "Cyan Black",
    category: ThemeCategory::Bright,
    palette:  Palette {
      bg_primary:     "#E0F7FA",
      bg_secondary:   "#80DEEA",
      bg_hover:       "#4DD0E1",
      text_primary:   "#006064",
      text_secondary: "#00838F",
      border_color:   "#26C6DA",
      accent_blue:    "#00ACC1",
      accent_orange:  "#00BCD4",
      ..LIGHT_PALETTE
    }
  },
  ThemeDefinition {
    id:       "dark",
    name:     "Dark Mode",
    category: ThemeCategory::Dark,
    palette:  Palette {
      bg_primary:     "#1a1a1a",
      bg_secondary:   "#2d2d2d",
      bg_hover:       "#3a3a3a",
      text_primary:   "#e8e8e8",
      text_secondary: "#b0b0b0",
      header_bg:      "#1f0033",
      footer_bg:      "#2f0052",
      border_color:   "#444",
      shadow_color:   "rgba(0, 0, 0, 0.5)",
      link_color:     "#5dade2",
      link_hover:     "#3498db",
      btn_primary:    "#3498db",
      btn_hover:      "#2980b9",
      accent_color:   "#e73aed",
      accent_blue:    "#90caf9",
      accent_orange:  "#ffb74d",
      success_color:  "#52be80",
      warning_color:  "#f8b88b",
      danger_color:   "#ec7063"
    }
  },
  ThemeDefinition {
    id:       "neon",
    name:     "Neon Dark",
    category: ThemeCategory::Dark,
    palette:  Palette {
      bg_primary:     "#0f0c29",
      bg_secondary:   "#302b63",
      bg_hover:       "#24243e",
      text_primary:   "#00ff88",
      text_secondary: "#00ffff",
      header_bg:      "#1a0066",
      footer_bg:      "#330099",
      border_color:   "#00ff88",
      shadow_color:   "rgba(0, 255, 136, 0.2)",
      link_color:     "#00ffff",
      link_hover:     "#00ff88",
      btn_primary:    "#00ff88",
      btn_hover:      "#00ffff",
      accent_color:   "#ff00ff",
      accent_blue:    "#00ffff",
      accent_orange:  "#ff9900",
      success_color:  "#00ff88",
      warning_color:  "#ffff00",
      danger_color:   "#ff0055"
    }
  },
  ThemeDefinition {
    id:       "midnight",
    name:     "Midnight",
    category: ThemeCategory::Dark,
    palette:  Palette {
      bg_primary:     "#001a4d",
      bg_secondary:   "#003d7a",
      bg_hover:       "#00509e",
      text_primary:   "#00d4ff",
      text_secondary: "#66e6ff",
      header_bg:      "#001a4d",
      footer_bg:      "#003d7a",
      border_color:   "#00a3cc",
      shadow_color:   "rgba(0, 212, 255, 0.2)",
      link_color:     "#00d4ff",
      link_hover:     "#66e6ff",
      btn_primary:    "#0088cc",
      btn_hover:      "#00aaff",
      accent_color:   "#00d4ff",
      accent_blue:    "#0088cc",
      accent_orange:  "#ffaa00",
      success_color:  "#00cc88",
      warning_color:  "#ffaa00",
      danger_color:   "#ff3366"
    }
  },
  ThemeDefinition {
    id:       "dracula",
    name:     "Dracula",
    category: ThemeCategory::Dark,
    palette:  Palette {
      bg_primary:     "#1e1e2e",
      bg_secondary:   "#44475a",
      bg_hover:       "#565a73",
      text_primary:   "#f8f8f2",
      text_secondary: "#bd93f9",
      header_bg:      "#44475a",
      footer_bg:      "#282a36",
      border_color:   "#6272a4",
      shadow_color:   "rgba(68, 71, 90, 0.5)",
      link_color:     "#8be9fd",
      link_hover:     "#ff79c6",
      btn_primary:    "#bd93f9",
      btn_hover:      "#ff79c6",
      accent_color:   "#ff79c6",
      accent_blue:    "#8be9fd",
      accent_orange:  "#ffb86c",
      success_color:  "#50fa7b",
      warning_color:  "#f1fa8c",
      danger_color:   "#ff5555"
    }
  },
  ThemeDefinition {
    id:       "dark-gray",
    name:     "Dark Gray",
    category: ThemeCategory::Dark,
    palette:  Palette {
      bg_primary:     "#303030",
      bg_secondary:   "#424242",
      bg_hover:       "#616161",
      text_primary:   "#FFFFFF",
      text_secondary: "#BDBDBD",
      border_color:   "#757575",
      accent_blue:    "#90CAF9",
      accent_orange:  "#FFB74D",
      ..LIGHT_PALETTE
    }
  }
];

/// Themes ordered by category (bright
/// first), then catalog order.
pub fn list_themes()
-> Vec<&'static ThemeDefinition> {
  ThemeCategory::all()
    .into_iter()
    .flat_map(|category| {
      THEMES.iter().filter(
        move |theme| {
          theme.category == category
        }
      )
    })
    .collect()
}

pub fn themes_by_category() -> Vec<(
  ThemeCategory,
  Vec<&'static ThemeDefinition>
)> {
  ThemeCategory::all()
    .into_iter()
    .map(|category| {
      (
        category,
        THEMES
          .iter()
          .filter(|theme| {
            theme.category == category
          })
          .collect()
      )
    })
    .collect()
}

pub fn find_theme(
  id: &str
) -> Option<&'static ThemeDefinition> {
  THEMES
    .iter()
    .find(|theme| theme.id == id)
}

pub fn default_theme()
-> &'static ThemeDefinition {
  &THEMES[0]
}

/// Where theme variables land: the
/// document root in a browser, a
/// stylesheet elsewhere.
pub trait StyleScope {
  fn set_variable(
    &mut self,
    name: &str,
    value: &str
  );

  fn set_dark_mode(
    &mut self,
    enabled: bool
  );
}

impl<T> StyleScope for &mut T
where
  T: StyleScope + ?Sized
{
  fn set_variable(
    &mut self,
    name: &str,
    value: &str
  ) {
    (**self).set_variable(name, value);
  }

  fn set_dark_mode(
    &mut self,
    enabled: bool
  ) {
    (**self).set_dark_mode(enabled);
  }
}

/// In-memory style scope that can be
/// written out as a `:root` block.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct StyleSheet {
  variables: BTreeMap<String, String>,
  dark_mode: bool
}

impl StyleSheet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn variable(
    &self,
    name: &str
  ) -> Option<&str> {
    self
      .variables
      .get(name)
      .map(String::as_str)
  }

  pub fn variable_count(
    &self
  ) -> usize {
    self.variables.len()
  }

  pub fn is_dark_mode(&self) -> bool {
    self.dark_mode
  }

  pub fn to_css(&self) -> String {
    let mut css =
      String::from(":root {\n");
    for (name, value) in
      &self.variables
    {
      css.push_str(&format!(
        "  {name}: {value};\n"
      ));
    }
    css.push_str("}\n");
    if self.dark_mode {
      css.push_str(&format!(
        "/* body.{DARK_MODE_CLASS} */\n"
      ));
    }
    css
  }
}

impl StyleScope for StyleSheet {
  fn set_variable(
    &mut self,
    name: &str,
    value: &str
  ) {
    self.variables.insert(
      name.to_string(),
      value.to_string()
    );
  }

  fn set_dark_mode(
    &mut self,
    enabled: bool
  ) {
    self.dark_mode = enabled;
  }
}

/// Applies catalog themes to a style
/// scope and persists the choice.
#[derive(Debug)]
pub struct ThemeEngine<S, P> {
  style: S,
  prefs: P
}

impl<S, P> ThemeEngine<S, P>
where
  S: StyleScope,
  P: PreferenceStore
{
  pub fn new(
    style: S,
    prefs: P
  ) -> Self {
    Self { style, prefs }
  }

  /// Unknown ids leave the style scope,
  /// the stored value and the active
  /// theme untouched and return `None`.
  #[tracing::instrument(skip(
    self, ctx
  ))]
  pub fn apply_theme(
    &mut self,
    ctx: &mut AppContext,
    id: &str
  ) -> Option<&'static ThemeDefinition>
  {
    let Some(theme) = find_theme(id)
    else {
      warn!(
        theme = id,
        "ignoring unknown theme"
      );
      return None;
    };

    for (name, value) in
      theme.palette.variables()
    {
      self
        .style
        .set_variable(name, value);
    }
    self.style.set_dark_mode(
      theme.category.is_dark()
    );

    if let Err(error) = self
      .prefs
      .set(SELECTED_THEME_KEY, theme.id)
    {
      warn!(
        %error,
        theme = theme.id,
        "failed to persist selected \
         theme"
      );
    }

    ctx.set_active_theme(theme.id);
    info!(
      theme = theme.id,
      dark = theme.category.is_dark(),
      "applied theme"
    );
    Some(theme)
  }

  /// Applies the stored theme, falling
  /// back to the default when nothing
  /// valid is stored.
  pub fn load_saved_theme(
    &mut self,
    ctx: &mut AppContext
  ) -> &'static ThemeDefinition {
    let saved = self
      .prefs
      .get(SELECTED_THEME_KEY);
    let theme = saved
      .as_deref()
      .and_then(find_theme)
      .unwrap_or_else(default_theme);
    debug!(
      saved = ?saved,
      theme = theme.id,
      "loading saved theme"
    );

    self
      .apply_theme(ctx, theme.id)
      .unwrap_or(theme)
  }

  pub fn style(&self) -> &S {
    &self.style
  }

  pub fn prefs(&self) -> &P {
    &self.prefs
  }

  pub fn into_parts(self) -> (S, P) {
    (self.style, self.prefs)
  }
}
