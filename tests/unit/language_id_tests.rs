/*!
 * Tests for best-effort language classification
 */

use dubwai::language_id::{FALLBACK_TAG, classify};

const ENGLISH_TEXT: &str = "Hello everyone, it is a real pleasure to meet you here today. \
    The weather has been wonderful all week and the garden is full of flowers. \
    I hope you are all doing well and enjoying the sunshine this morning.";

const ARABIC_TEXT: &str = "مرحبا بكم جميعا في هذا اليوم الجميل. الطقس رائع هذا الأسبوع \
    والحديقة مليئة بالأزهار. أتمنى أن تكونوا جميعا بخير وأن تستمتعوا بأشعة الشمس.";

/// Test English text classifies as "en"
#[test]
fn test_classify_withEnglishText_shouldReturnEn() {
    assert_eq!(classify(ENGLISH_TEXT), "en");
}

/// Test Arabic text classifies as "ar"
#[test]
fn test_classify_withArabicText_shouldReturnAr() {
    assert_eq!(classify(ARABIC_TEXT), "ar");
}

/// Test empty input fails open to the fallback tag
#[test]
fn test_classify_withEmptyInput_shouldReturnFallback() {
    assert_eq!(classify(""), FALLBACK_TAG);
    assert_eq!(classify("   \n "), FALLBACK_TAG);
}

/// Test unclassifiable input fails open to the fallback tag
#[test]
fn test_classify_withDigitsOnly_shouldReturnFallback() {
    assert_eq!(classify("12345 67890 +++ --- 42"), FALLBACK_TAG);
}

/// Test classification never returns an empty tag
#[test]
fn test_classify_withAnyInput_shouldNeverReturnEmptyTag() {
    for input in ["", "x", ENGLISH_TEXT, ARABIC_TEXT, "1234"] {
        assert!(!classify(input).is_empty());
    }
}

/// Test inputs past the sample bound classify without panicking on
/// multi-byte boundaries
#[test]
fn test_classify_withVeryLongMultiByteText_shouldUseBoundedSample() {
    let long_arabic = ARABIC_TEXT.repeat(100);
    assert!(long_arabic.chars().count() > 3000);
    assert_eq!(classify(&long_arabic), "ar");
}
