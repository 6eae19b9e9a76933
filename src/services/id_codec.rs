/*
 * Responsibility
 * - memo の BIGSERIAL id を URL / JSON に出す公開 ID へ変換する
 * - memos テーブルは全ユーザー共有の連番なので、生の id を返すと
 *   他ユーザーの memo 作成数や作成ペースが推測できてしまう。公開 ID はそれを隠す
 * - 1 つの memo に公開 ID は 1 つだけ (canonical でない文字列は拒否)
 */
use sqids::Sqids;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug, Error)]
pub enum IdCodecError {
    #[error("SQIDS_MIN_LENGTH must fit in a public memo id (0..=255), got {value}")]
    InvalidMinLength { value: usize },
    #[error("SQIDS_ALPHABET cannot build public memo ids: {0}")]
    Alphabet(#[source] sqids::Error),
    #[error("memo row id {value} is negative and has no public id")]
    NegativeId { value: i64 },
    #[error("could not encode memo row id: {0}")]
    Encode(#[source] sqids::Error),
    #[error("not a public memo id")]
    DecodeInvalidFormat,
    #[error("public memo id decodes past the memo id range")]
    DecodeOutOfRange,
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()
            .map_err(IdCodecError::Alphabet)?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String> {
        let n = u64::try_from(id).map_err(|_| IdCodecError::NegativeId { value: id })?;
        self.sqids.encode(&[n]).map_err(IdCodecError::Encode)
    }

    pub fn decode(&self, public_id: &str) -> Result<i64> {
        let nums = self.sqids.decode(public_id);
        let [n] = nums.as_slice() else {
            return Err(IdCodecError::DecodeInvalidFormat);
        };
        // Only the canonical encoding is accepted, so one memo has exactly one public id.
        if self.sqids.encode(&[*n]).ok().as_deref() != Some(public_id) {
            return Err(IdCodecError::DecodeInvalidFormat);
        }
        i64::try_from(*n).map_err(|_| IdCodecError::DecodeOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    fn codec() -> IdCodec {
        IdCodec::new(10, ALPHABET).unwrap()
    }

    #[test]
    fn encoded_ids_have_min_length_and_decode_back() {
        let codec = codec();
        let public = codec.encode(42).unwrap();
        assert!(public.len() >= 10);
        assert_eq!(codec.decode(&public).unwrap(), 42);
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(matches!(
            codec().encode(-1),
            Err(IdCodecError::NegativeId { value: -1 })
        ));
    }

    #[test]
    fn garbage_does_not_decode() {
        let codec = codec();
        assert!(matches!(
            codec.decode("!!!"),
            Err(IdCodecError::DecodeInvalidFormat)
        ));
        assert!(matches!(
            codec.decode(""),
            Err(IdCodecError::DecodeInvalidFormat)
        ));
    }

    #[test]
    fn alphabet_errors_name_the_setting() {
        let err = IdCodec::new(10, "ab").unwrap_err();
        assert!(matches!(err, IdCodecError::Alphabet(_)));
        assert!(err.to_string().starts_with("SQIDS_ALPHABET"));
    }

    #[test]
    fn min_length_must_fit_in_u8() {
        assert!(matches!(
            IdCodec::new(256, ALPHABET),
            Err(IdCodecError::InvalidMinLength { value: 256 })
        ));
    }
}
