use crate::{parse_defining_data, DefiningData, ParseError};

const VIRTUAL_SURFACE: &str = "\
order: a b c d e
ray: a c
a: b e
b: a c
c: b d
d: c e
e: a d
";

const SIERPINSKI_CARPET: &str = "\
order: a b c d e f g h i j
ray: a g
a: b e f j
b: a c f g
c: b d g h
d: c e h i
e: a d i j
f: a b g j
g: b c f h
h: c d g i
i: d e h j
j: a e f i
";

const ALMOST_VIRTUAL_SURFACE: &str = "\
order: a b c d e f
ray: c f
a: b c f
b: a c f
c: a b d
d: c e
e: d f
f: a b e
";

const WEIRD_GROUP: &str = "\
order: a b c d e f g h z
ray: a z
a: b g h
b: a z
c: d e g z
d: c e f z
e: c d f z
f: d e h z
g: a c
h: a f
z: b c d e f
";

// `c` is ranked before `b`.
const THETA_GRAPH: &str = "\
order: a c b d e f g h i
ray: a c
a: b e h
b: a d
c: d g i
d: b c
e: a f
f: e g
g: c f
h: a i
i: c h
";

/// The example groups shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// The pentagon group, virtually a hyperbolic surface group. Its
    /// horospheres are lines.
    VirtualSurface,
    /// A ten-letter group, virtually a 3-manifold group with boundary, whose
    /// horospheres look like a Sierpinski carpet.
    SierpinskiCarpet,
    /// A branched surface whose divergence graph joins suffixes of different
    /// lengths.
    AlmostVirtualSurface,
    /// A group whose divergence graph misses some edges between words that
    /// differ by a commuting pair.
    WeirdGroup,
    /// Virtually a hyperbolic surface amalgam over a theta graph.
    ThetaGraph,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::VirtualSurface,
        Dataset::SierpinskiCarpet,
        Dataset::AlmostVirtualSurface,
        Dataset::WeirdGroup,
        Dataset::ThetaGraph,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::VirtualSurface => "virtual-surface",
            Dataset::SierpinskiCarpet => "sierpinski-carpet",
            Dataset::AlmostVirtualSurface => "almost-virtual-surface",
            Dataset::WeirdGroup => "weird-group",
            Dataset::ThetaGraph => "theta-graph",
        }
    }

    /// Defining data in the line format.
    pub fn source(&self) -> &'static str {
        match self {
            Dataset::VirtualSurface => VIRTUAL_SURFACE,
            Dataset::SierpinskiCarpet => SIERPINSKI_CARPET,
            Dataset::AlmostVirtualSurface => ALMOST_VIRTUAL_SURFACE,
            Dataset::WeirdGroup => WEIRD_GROUP,
            Dataset::ThetaGraph => THETA_GRAPH,
        }
    }

    pub fn from_name(name: &str) -> Option<Dataset> {
        Dataset::ALL.into_iter().find(|dataset| dataset.name() == name)
    }

    pub fn load(&self) -> Result<DefiningData, ParseError> {
        parse_defining_data(self.source())
    }
}
