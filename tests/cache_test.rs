#![allow(missing_docs)]

use fieldmap::{Mapper, MapperError, Record};
use std::thread;

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Src {
    #[map("path=inner,flag;flip")]
    flag: bool,
    #[map("path=inner,count")]
    count: u32,
}

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Inner {
    flag: bool,
    count: u32,
}

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Dst {
    inner: Option<Inner>,
}

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Other {
    inner: Inner,
}

fn flipping_mapper() -> Mapper {
    Mapper::builder()
        .transform("flip", |b: &bool| !b)
        .capacity(4)
        .build()
}

#[test]
fn test_repeated_lookups_share_one_decoder() -> fieldmap::Result<()> {
    let mapper = flipping_mapper();
    let src = Src {
        flag: true,
        count: 5,
    };

    let first = mapper.decoder::<Src, Dst>()?;
    let second = mapper.decoder::<Src, Dst>()?;
    assert_eq!(mapper.cached_decoders(), 1);
    assert!(mapper.is_cached::<Src, Dst>());

    let mut a = Dst::default();
    let mut b = Dst::default();
    first.decode(&src, &mut a)?;
    second.decode(&src, &mut b)?;
    assert_eq!(a, b);
    assert_eq!(
        a.inner,
        Some(Inner {
            flag: false,
            count: 5
        })
    );

    mapper.decoder::<Src, Other>()?;
    assert_eq!(mapper.cached_decoders(), 2);
    Ok(())
}

#[test]
fn test_cached_decoder_keeps_its_transform() -> fieldmap::Result<()> {
    let mapper = flipping_mapper();
    let before = mapper.decoder::<Src, Dst>()?;

    mapper.register_transform("flip", |b: &bool| *b);

    let src = Src {
        flag: true,
        count: 1,
    };
    let mut dst = Dst::default();
    before.decode(&src, &mut dst)?;
    assert_eq!(dst.inner.map(|i| i.flag), Some(false));

    // A pair built after the overwrite sees the new transform.
    let other: Other = mapper.map(&src)?;
    assert!(other.inner.flag);
    Ok(())
}

#[test]
fn test_mappers_are_independent() {
    let configured = flipping_mapper();
    let bare = Mapper::new();

    assert!(configured.decoder::<Src, Dst>().is_ok());
    let err = bare.decoder::<Src, Dst>().unwrap_err();
    assert!(matches!(err.root_cause(), MapperError::UnknownTransform { .. }));
    assert_eq!(bare.cached_decoders(), 0);
}

#[test]
fn test_concurrent_lookups_and_decodes() -> fieldmap::Result<()> {
    let mapper = flipping_mapper();

    let results: Vec<fieldmap::Result<Dst>> = thread::scope(|s| {
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let mapper = &mapper;
                s.spawn(move || -> fieldmap::Result<Dst> {
                    let decoder = mapper.decoder::<Src, Dst>()?;
                    let mut dst = Dst::default();
                    decoder.decode(
                        &Src {
                            flag: i % 2 == 0,
                            count: i,
                        },
                        &mut dst,
                    )?;
                    Ok(dst)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("decoder thread panicked"))
            .collect()
    });

    assert_eq!(mapper.cached_decoders(), 1);
    for (i, result) in (0..8u32).zip(results) {
        let dst = result?;
        assert_eq!(
            dst.inner,
            Some(Inner {
                flag: i % 2 != 0,
                count: i
            })
        );
    }
    Ok(())
}

#[test]
fn test_decode_any_rejects_foreign_records() -> fieldmap::Result<()> {
    let mapper = flipping_mapper();
    let decoder = mapper.decoder::<Src, Dst>()?;

    let mut wrong = Other::default();
    let err = decoder
        .decode_any(&Src::default(), &mut wrong)
        .unwrap_err();
    assert!(matches!(err, MapperError::InvalidArgument(_)));

    let mut dst = Dst::default();
    let err = decoder.decode_any(&42u32, &mut dst).unwrap_err();
    assert!(matches!(err, MapperError::InvalidArgument(_)));

    decoder.decode_any(&Src::default(), &mut dst)?;
    assert!(dst.inner.is_some());
    Ok(())
}
