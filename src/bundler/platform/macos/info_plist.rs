//! Info.plist generation.

use crate::config::PakagerSettings;
use plist::{Dictionary, Value};

/// Builds the Info.plist dictionary for a bundle.
///
/// `customInfo` entries are merged last and override generated keys.
pub fn info_plist(settings: &PakagerSettings, icon_file: Option<&str>) -> Dictionary {
    let mut dict = Dictionary::new();
    let mac = &settings.mac;

    dict.insert("CFBundleDisplayName".into(), settings.real_name.clone().into());
    dict.insert("CFBundleName".into(), settings.real_name.clone().into());
    dict.insert("CFBundleExecutable".into(), settings.real_name.clone().into());
    dict.insert("CFBundleIdentifier".into(), settings.app_id.clone().into());
    dict.insert("CFBundleInfoDictionaryVersion".into(), "6.0".into());
    dict.insert("CFBundlePackageType".into(), "APPL".into());
    dict.insert("CFBundleShortVersionString".into(), settings.version.clone().into());
    dict.insert("CFBundleVersion".into(), settings.version.clone().into());
    if let Some(icon) = icon_file {
        dict.insert("CFBundleIconFile".into(), icon.into());
    }
    if let Some(copyright) = &settings.copyright {
        dict.insert("NSHumanReadableCopyright".into(), copyright.clone().into());
    }
    dict.insert("LSUIElement".into(), Value::Boolean(mac.background_app));
    dict.insert(
        "NSRequiresAquaSystemAppearance".into(),
        Value::Boolean(!mac.dark_mode_support),
    );
    if let Some(category) = &mac.category {
        dict.insert("LSApplicationCategoryType".into(), category.clone().into());
    }

    for (key, value) in &mac.custom_info {
        match json_to_plist(value) {
            Some(value) => {
                dict.insert(key.clone(), value);
            }
            None => log::warn!("Skipping customInfo key {key}: null has no plist equivalent"),
        }
    }
    dict
}

/// Serializes the dictionary as an XML property list.
pub fn to_xml(dict: Dictionary) -> Result<Vec<u8>, plist::Error> {
    let mut buf = Vec::new();
    Value::Dictionary(dict).to_writer_xml(&mut buf)?;
    Ok(buf)
}

fn json_to_plist(value: &serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;
    match value {
        Json::Null => None,
        Json::Bool(b) => Some(Value::Boolean(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Integer(i.into()))
            } else if let Some(u) = n.as_u64() {
                Some(Value::Integer(u.into()))
            } else {
                n.as_f64().map(Value::Real)
            }
        }
        Json::String(s) => Some(Value::String(s.clone())),
        Json::Array(items) => Some(Value::Array(items.iter().filter_map(json_to_plist).collect())),
        Json::Object(map) => {
            let mut dict = Dictionary::new();
            for (key, value) in map {
                if let Some(value) = json_to_plist(value) {
                    dict.insert(key.clone(), value);
                }
            }
            Some(Value::Dictionary(dict))
        }
    }
}
