//! Field settings translation between symbolic and stored representations.
//!
//! Some field types expose settings with symbolic constant names to clients while
//! storing compact integer codes. A [`FieldTypeProcessor`] converts a settings record
//! on its way in (`pre_process_field_settings`) and back out
//! (`post_process_field_settings`).
//!
//! [`MediaProcessor`] handles the `mediaType` setting of media fields.

use bson::Bson;

use crate::{
    error::{RecordStoreError, RecordStoreResult},
    record::Record,
};

/// Translates the settings record of a field type between its external (client) and
/// internal (stored) forms.
pub trait FieldTypeProcessor {
    /// Converts externally supplied settings into their stored form.
    fn pre_process_field_settings(&self, settings: Record) -> RecordStoreResult<Record>;

    /// Converts stored settings into their external form.
    fn post_process_field_settings(&self, settings: Record) -> RecordStoreResult<Record>;
}

/// The closed set of media player types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Flash,
    QuickTime,
    RealPlayer,
    Silverlight,
    WindowsMedia,
    Html5Video,
    Html5Audio,
}

impl MediaType {
    /// Every media type, in code order.
    pub const ALL: [MediaType; 7] = [
        MediaType::Flash,
        MediaType::QuickTime,
        MediaType::RealPlayer,
        MediaType::Silverlight,
        MediaType::WindowsMedia,
        MediaType::Html5Video,
        MediaType::Html5Audio,
    ];

    /// The symbolic constant name exposed to clients.
    pub fn name(self) -> &'static str {
        match self {
            MediaType::Flash => "TYPE_FLASH",
            MediaType::QuickTime => "TYPE_QUICKTIME",
            MediaType::RealPlayer => "TYPE_REALPLAYER",
            MediaType::Silverlight => "TYPE_SILVERLIGHT",
            MediaType::WindowsMedia => "TYPE_WINDOWSMEDIA",
            MediaType::Html5Video => "TYPE_HTML5_VIDEO",
            MediaType::Html5Audio => "TYPE_HTML5_AUDIO",
        }
    }

    /// The integer code stored in settings.
    pub fn code(self) -> i32 {
        match self {
            MediaType::Flash => 1,
            MediaType::QuickTime => 2,
            MediaType::RealPlayer => 3,
            MediaType::Silverlight => 4,
            MediaType::WindowsMedia => 5,
            MediaType::Html5Video => 6,
            MediaType::Html5Audio => 7,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        MediaType::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn from_code(code: i64) -> Option<Self> {
        MediaType::ALL
            .into_iter()
            .find(|t| i64::from(t.code()) == code)
    }
}

/// Maps a media type constant name to its stored code.
pub fn to_internal(name: &str) -> Option<i32> {
    MediaType::from_name(name).map(MediaType::code)
}

/// Maps a stored code to its media type constant name.
pub fn to_external(code: i64) -> Option<&'static str> {
    MediaType::from_code(code).map(MediaType::name)
}

/// Translates the `mediaType` setting of media fields.
///
/// Settings without a `mediaType` entry pass through untouched; all other entries are
/// always left as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaProcessor;

impl MediaProcessor {
    const FIELD: &'static str = "mediaType";
}

impl FieldTypeProcessor for MediaProcessor {
    fn pre_process_field_settings(&self, mut settings: Record) -> RecordStoreResult<Record> {
        let code = match settings.get(Self::FIELD) {
            None => return Ok(settings),
            Some(Bson::String(name)) => to_internal(name).ok_or_else(|| {
                RecordStoreError::InvalidRecord(format!("unknown media type '{name}'"))
            })?,
            Some(other) => {
                return Err(RecordStoreError::InvalidRecord(format!(
                    "media type must be a constant name, found {other}"
                )));
            }
        };

        settings.insert(Self::FIELD, code);

        Ok(settings)
    }

    fn post_process_field_settings(&self, mut settings: Record) -> RecordStoreResult<Record> {
        let code = match settings.get(Self::FIELD) {
            None => return Ok(settings),
            Some(Bson::Int32(code)) => i64::from(*code),
            Some(Bson::Int64(code)) => *code,
            Some(other) => {
                return Err(RecordStoreError::InvalidRecord(format!(
                    "media type must be an integer code, found {other}"
                )));
            }
        };

        let name = to_external(code).ok_or_else(|| {
            RecordStoreError::InvalidRecord(format!("unknown media type code {code}"))
        })?;

        settings.insert(Self::FIELD, name);

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn names_and_codes_are_inverse() {
        for media_type in MediaType::ALL {
            assert_eq!(to_internal(media_type.name()), Some(media_type.code()));
            assert_eq!(to_external(i64::from(media_type.code())), Some(media_type.name()));
        }
    }

    #[test]
    fn pre_process_translates_every_constant() {
        for media_type in MediaType::ALL {
            let processed = MediaProcessor
                .pre_process_field_settings(doc! { "mediaType": media_type.name() })
                .unwrap();

            assert_eq!(processed, doc! { "mediaType": media_type.code() });
        }
    }

    #[test]
    fn post_process_translates_every_code() {
        for media_type in MediaType::ALL {
            let processed = MediaProcessor
                .post_process_field_settings(doc! { "mediaType": media_type.code() })
                .unwrap();

            assert_eq!(processed, doc! { "mediaType": media_type.name() });
        }
    }

    #[test]
    fn other_settings_are_preserved() {
        let processed = MediaProcessor
            .pre_process_field_settings(doc! { "mediaType": "TYPE_FLASH", "autoplay": true })
            .unwrap();

        assert_eq!(processed, doc! { "mediaType": 1, "autoplay": true });
    }

    #[test]
    fn settings_without_media_type_pass_through() {
        let settings = doc! { "autoplay": false };

        assert_eq!(
            MediaProcessor.pre_process_field_settings(settings.clone()).unwrap(),
            settings
        );
        assert_eq!(
            MediaProcessor.post_process_field_settings(settings.clone()).unwrap(),
            settings
        );
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(matches!(
            MediaProcessor.pre_process_field_settings(doc! { "mediaType": "TYPE_GIF" }),
            Err(RecordStoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            MediaProcessor.post_process_field_settings(doc! { "mediaType": 99 }),
            Err(RecordStoreError::InvalidRecord(_))
        ));
    }
}
