use std::borrow::Cow;

/// Combine a namespace and one or more keys into a full byte path.
///
/// The namespace and all keys other than the last one are prefixed with
/// their lengths (2 bytes big-endian), so that we know where a key ends and
/// where the next one starts:
///
/// ```plain
/// len(namespace) | namespace | len(key1) | key1 | len(key2) | key2 | key3
/// ```
///
/// Panics if any key's length exceeds `u16::MAX`.
pub fn nested_namespaces_with_key(
    maybe_namespace: Option<&[u8]>,
    prefixes: &[Cow<[u8]>],
    maybe_key: Option<&Cow<[u8]>>,
) -> Vec<u8> {
    let mut size = 0;
    if let Some(namespace) = maybe_namespace {
        size += namespace.len() + 2;
    }
    for prefix in prefixes {
        size += prefix.len() + 2;
    }
    if let Some(key) = maybe_key {
        size += key.len();
    }

    let mut out = Vec::with_capacity(size);
    if let Some(namespace) = maybe_namespace {
        out.extend_from_slice(&encode_length(namespace));
        out.extend_from_slice(namespace);
    }
    for prefix in prefixes {
        out.extend_from_slice(&encode_length(prefix));
        out.extend_from_slice(prefix);
    }
    if let Some(key) = maybe_key {
        out.extend_from_slice(key);
    }
    out
}

/// Two bytes in big endian representing the slice's length.
///
/// Panics if the slice is longer than 65535 bytes.
pub fn encode_length<B>(bytes: B) -> [u8; 2]
where
    B: AsRef<[u8]>,
{
    let len = bytes.as_ref().len();
    if len > 0xffff {
        panic!("can't encode length because byte slice is too long: {len} > {}", u16::MAX);
    }

    (len as u16).to_be_bytes()
}

/// The smallest byte string that is greater than every string prefixed by
/// `bytes`. Used as the exclusive upper bound when iterating a namespace.
pub fn increment_last_byte(mut bytes: Vec<u8>) -> Vec<u8> {
    debug_assert!(
        bytes.iter().any(|x| *x != u8::MAX),
        "bytes are entirely 255"
    );
    for byte in bytes.iter_mut().rev() {
        if *byte == u8::MAX {
            *byte = 0;
        } else {
            *byte += 1;
            break;
        }
    }
    bytes
}

/// Strip the namespace off a full storage key.
pub fn trim(namespace: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(
        key.starts_with(namespace),
        "byte slice doesn't start with the given namespace"
    );
    key[namespace.len()..].to_vec()
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, test_case::test_case};

    #[test_case(vec![1, 2, 3] => vec![1, 2, 4]; "simple")]
    #[test_case(vec![1, 255] => vec![2, 0]; "carry")]
    fn incrementing(bytes: Vec<u8>) -> Vec<u8> {
        increment_last_byte(bytes)
    }

    #[test]
    fn nesting() {
        let key = nested_namespaces_with_key(
            Some(b"ns".as_slice()),
            &[Cow::Borrowed(b"a".as_slice())],
            Some(&Cow::Borrowed(b"bc".as_slice())),
        );
        assert_eq!(key, b"\x00\x02ns\x00\x01abc".to_vec());
    }
}
