use rusttype::Font;
use std::collections::HashMap;

use crate::style::FontWeight;

/// Loads and caches system fonts, one entry per (family, weight)
/// pair. Lookup is by common family name ("Times New Roman", "serif");
/// the per-platform loaders map that to actual font files.
pub struct FontManager {
    fonts: HashMap<(String, FontWeight), Font<'static>>,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    pub fn load_system_font(&mut self, family: &str, weight: FontWeight) -> Option<&Font<'static>> {
        let key = (family.to_string(), weight);
        if self.fonts.contains_key(&key) {
            return self.fonts.get(&key);
        }

        let font_data = self.get_system_font_bytes(family, weight)?;

        // Font borrows its byte source; leak the buffer so the cached
        // entry is 'static. Bounded by the handful of fonts a page
        // ever asks for.
        let font_bytes: &'static [u8] = Box::leak(font_data.into_boxed_slice());
        let font = Font::try_from_bytes(font_bytes)?;

        self.fonts.insert(key.clone(), font);
        self.fonts.get(&key)
    }

    fn get_system_font_bytes(&self, family: &str, weight: FontWeight) -> Option<Vec<u8>> {
        #[cfg(target_os = "windows")]
        {
            return self.load_windows_font(family, weight);
        }

        #[cfg(target_os = "macos")]
        {
            return self.load_macos_font(family, weight);
        }

        #[cfg(target_os = "linux")]
        {
            return self.load_linux_font(family, weight);
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            let _ = (family, weight);
            None
        }
    }

    #[cfg(target_os = "windows")]
    fn load_windows_font(&self, family: &str, weight: FontWeight) -> Option<Vec<u8>> {
        use std::env;
        use std::fs;

        let fonts_dir = env::var("WINDIR")
            .ok()
            .map(|wd| format!("{}\\Fonts", wd))?;

        let bold = weight == FontWeight::Bold;
        let filename = match family.to_lowercase().as_str() {
            "times new roman" | "times" | "serif" => {
                if bold {
                    "timesbd.ttf"
                } else {
                    "times.ttf"
                }
            }
            "arial" | "sans-serif" => {
                if bold {
                    "arialbd.ttf"
                } else {
                    "arial.ttf"
                }
            }
            "courier new" | "courier" | "monospace" => {
                if bold {
                    "courbd.ttf"
                } else {
                    "cour.ttf"
                }
            }
            _ => return None,
        };

        let path = format!("{}\\{}", fonts_dir, filename);
        fs::read(&path).ok()
    }

    #[cfg(target_os = "macos")]
    fn load_macos_font(&self, family: &str, weight: FontWeight) -> Option<Vec<u8>> {
        use std::fs;

        let home = std::env::var("HOME").ok()?;
        let fonts_paths = vec![
            format!("{}/Library/Fonts", home),
            "/Library/Fonts".to_string(),
            "/System/Library/Fonts".to_string(),
            "/System/Library/Fonts/Supplemental".to_string(),
        ];

        let bold = weight == FontWeight::Bold;
        let filename = match family.to_lowercase().as_str() {
            "times new roman" | "times" | "serif" => {
                if bold {
                    "Times New Roman Bold.ttf"
                } else {
                    "Times New Roman.ttf"
                }
            }
            "arial" | "sans-serif" => {
                if bold {
                    "Arial Bold.ttf"
                } else {
                    "Arial.ttf"
                }
            }
            "courier new" | "courier" | "monospace" => {
                if bold {
                    "Courier New Bold.ttf"
                } else {
                    "Courier New.ttf"
                }
            }
            _ => return None,
        };

        for fonts_path in fonts_paths {
            let path = format!("{}/{}", fonts_path, filename);
            if let Ok(data) = fs::read(&path) {
                return Some(data);
            }
        }
        None
    }

    #[cfg(target_os = "linux")]
    fn load_linux_font(&self, family: &str, weight: FontWeight) -> Option<Vec<u8>> {
        use std::fs;

        let home_fonts = format!("{}/.local/share/fonts", std::env::var("HOME").ok()?);
        let fonts_paths = vec![
            "/usr/share/fonts/truetype",
            "/usr/local/share/fonts/truetype",
            &home_fonts,
        ];

        let bold = weight == FontWeight::Bold;
        let filenames = match family.to_lowercase().as_str() {
            "times new roman" | "times" | "serif" => {
                if bold {
                    vec![
                        "liberation/LiberationSerif-Bold.ttf",
                        "dejavu/DejaVuSerif-Bold.ttf",
                    ]
                } else {
                    vec![
                        "liberation/LiberationSerif-Regular.ttf",
                        "dejavu/DejaVuSerif.ttf",
                    ]
                }
            }
            "arial" | "sans-serif" | "sans" => {
                if bold {
                    vec![
                        "liberation/LiberationSans-Bold.ttf",
                        "dejavu/DejaVuSans-Bold.ttf",
                    ]
                } else {
                    vec![
                        "liberation/LiberationSans-Regular.ttf",
                        "dejavu/DejaVuSans.ttf",
                    ]
                }
            }
            "courier new" | "courier" | "monospace" => {
                if bold {
                    vec![
                        "liberation/LiberationMono-Bold.ttf",
                        "dejavu/DejaVuSansMono-Bold.ttf",
                    ]
                } else {
                    vec![
                        "liberation/LiberationMono-Regular.ttf",
                        "dejavu/DejaVuSansMono.ttf",
                    ]
                }
            }
            _ => {
                if bold {
                    vec![
                        "liberation/LiberationSerif-Bold.ttf",
                        "dejavu/DejaVuSerif-Bold.ttf",
                    ]
                } else {
                    vec![
                        "liberation/LiberationSerif-Regular.ttf",
                        "dejavu/DejaVuSerif.ttf",
                    ]
                }
            }
        };

        for fonts_path in fonts_paths {
            for filename in &filenames {
                let path = format!("{}/{}", fonts_path, filename);
                if let Ok(data) = fs::read(&path) {
                    return Some(data);
                }
            }
        }
        None
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}
