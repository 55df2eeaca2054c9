#![allow(missing_docs)]

use fieldmap::{Mapper, Record};
use proptest::prelude::*;

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Src {
    #[map("path=b,c")]
    a: i64,
    #[map("path=b,b")]
    b: String,
    #[map("path=b,a")]
    c: bool,
    #[map("path=extra")]
    d: Option<u16>,
}

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Leafs {
    a: bool,
    b: String,
    c: i64,
}

#[derive(Clone, Default, Debug, PartialEq, Record)]
struct Dst {
    b: Option<Leafs>,
    extra: u16,
}

proptest! {
    #[test]
    fn untransformed_leaves_copy_exactly(
        a in any::<i64>(),
        b in ".{0,24}",
        c in any::<bool>(),
        d in proptest::option::of(any::<u16>()),
    ) {
        let mapper = Mapper::new();
        let src = Src { a, b: b.clone(), c, d };
        let dst: Dst = mapper.map(&src).expect("decode");

        prop_assert_eq!(dst.b, Some(Leafs { a: c, b, c: a }));
        prop_assert_eq!(dst.extra, d.unwrap_or_default());
    }
}
