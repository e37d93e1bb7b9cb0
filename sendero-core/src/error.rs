//! Error types for the sendero core library.
//!
//! Defines the error enum exposed by the subgraph API, stable machine-readable
//! codes for every variant, and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error produced by [`crate::Subgraph`] operations.
///
/// Every failing operation leaves the subgraph exactly as it was before the
/// call.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SubgraphError {
    /// A buffer could not be allocated.
    #[error("failed to allocate {requested} elements for the {what}")]
    Allocation {
        /// Buffer that could not be allocated.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },
    /// The subgraph has been destroyed and no longer accepts mutations.
    #[error("subgraph has been destroyed")]
    Destroyed,
    /// Feature vectors must have positive dimension.
    #[error("feature vectors must have positive dimension")]
    ZeroDimension,
    /// The flat feature buffer does not hold `node_n * feat_n` values.
    #[error("feature buffer has {got} values but {expected} were expected")]
    FeatureLengthMismatch {
        /// Required number of values.
        expected: usize,
        /// Number of values supplied by the caller.
        got: usize,
    },
    /// A per-node buffer does not hold exactly one entry per node.
    #[error("label buffer has {got} entries but the subgraph has {expected} nodes")]
    LabelLengthMismatch {
        /// Number of nodes in the subgraph.
        expected: usize,
        /// Number of labels supplied by the caller.
        got: usize,
    },
    /// The precomputed distance matrix is not `node_n * node_n`.
    #[error("distance matrix has {got} entries but {expected} were expected")]
    MatrixLengthMismatch {
        /// Required number of entries.
        expected: usize,
        /// Number of entries supplied by the caller.
        got: usize,
    },
    /// Requested node index was outside the subgraph.
    #[error("node {index} is out of bounds for a subgraph of {len} nodes")]
    NodeOutOfBounds {
        /// The requested node index.
        index: usize,
        /// Number of nodes in the subgraph.
        len: usize,
    },
    /// No feature block has been attached.
    #[error("no feature block has been attached to the subgraph")]
    FeaturesUnset,
    /// Two feature spaces had different dimensions.
    #[error("feature dimension mismatch: left={left}, right={right}")]
    FeatureDimensionMismatch {
        /// Dimension of the receiving side.
        left: usize,
        /// Dimension of the supplying side.
        right: usize,
    },
    /// Neither a precomputed matrix nor a metric is available.
    #[error("no distance matrix is attached and no metric is selected")]
    NoDistanceFunction,
    /// A node position does not address a row of the distance matrix.
    #[error("position {position} lies outside the distance matrix (stride {stride})")]
    PositionOutsideMatrix {
        /// Position that was looked up.
        position: usize,
        /// Row stride of the distance matrix.
        stride: usize,
    },
    /// Distance resolution produced NaN.
    #[error("distance between nodes {left} and {right} is undefined (NaN)")]
    NonFiniteDistance {
        /// First node of the pair.
        left: usize,
        /// Second node of the pair.
        right: usize,
    },
    /// Density evaluation was requested before `df` was configured.
    #[error("degrees of freedom must be set before evaluating densities")]
    DegreesOfFreedomUnset,
    /// `df` must be finite and strictly positive.
    #[error("degrees of freedom must be finite and positive (got {got})")]
    InvalidDegreesOfFreedom {
        /// The rejected value.
        got: f32,
    },
    /// Split fractions must lie in `[0, 1]`.
    #[error("split fraction must lie in [0, 1] (got {got})")]
    InvalidSplitFraction {
        /// The rejected value.
        got: f32,
    },
    /// Provided output buffer length did not match the number of pairs.
    #[error("output buffer has length {out} but {expected} pairs were given")]
    OutputLengthMismatch {
        /// Caller-provided buffer length.
        out: usize,
        /// Number of pairs requested.
        expected: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SubgraphError`] variants.
    enum SubgraphErrorCode for SubgraphError {
        /// A buffer could not be allocated.
        Allocation => Allocation { .. } => "SUBGRAPH_ALLOCATION",
        /// The subgraph has been destroyed.
        Destroyed => Destroyed => "SUBGRAPH_DESTROYED",
        /// Feature vectors must have positive dimension.
        ZeroDimension => ZeroDimension => "SUBGRAPH_ZERO_DIMENSION",
        /// The flat feature buffer has the wrong length.
        FeatureLengthMismatch => FeatureLengthMismatch { .. } => "SUBGRAPH_FEATURE_LENGTH_MISMATCH",
        /// A per-node buffer has the wrong length.
        LabelLengthMismatch => LabelLengthMismatch { .. } => "SUBGRAPH_LABEL_LENGTH_MISMATCH",
        /// The precomputed distance matrix has the wrong length.
        MatrixLengthMismatch => MatrixLengthMismatch { .. } => "SUBGRAPH_MATRIX_LENGTH_MISMATCH",
        /// Requested node index was outside the subgraph.
        NodeOutOfBounds => NodeOutOfBounds { .. } => "SUBGRAPH_NODE_OUT_OF_BOUNDS",
        /// No feature block has been attached.
        FeaturesUnset => FeaturesUnset => "SUBGRAPH_FEATURES_UNSET",
        /// Two feature spaces had different dimensions.
        FeatureDimensionMismatch => FeatureDimensionMismatch { .. } => "SUBGRAPH_FEATURE_DIMENSION_MISMATCH",
        /// Neither a matrix nor a metric is available.
        NoDistanceFunction => NoDistanceFunction => "SUBGRAPH_NO_DISTANCE_FUNCTION",
        /// A node position does not address the distance matrix.
        PositionOutsideMatrix => PositionOutsideMatrix { .. } => "SUBGRAPH_POSITION_OUTSIDE_MATRIX",
        /// Distance resolution produced NaN.
        NonFiniteDistance => NonFiniteDistance { .. } => "SUBGRAPH_NON_FINITE_DISTANCE",
        /// `df` has not been configured.
        DegreesOfFreedomUnset => DegreesOfFreedomUnset => "SUBGRAPH_DF_UNSET",
        /// `df` is not finite and positive.
        InvalidDegreesOfFreedom => InvalidDegreesOfFreedom { .. } => "SUBGRAPH_INVALID_DF",
        /// Split fraction outside `[0, 1]`.
        InvalidSplitFraction => InvalidSplitFraction { .. } => "SUBGRAPH_INVALID_SPLIT_FRACTION",
        /// Output buffer length did not match the number of pairs.
        OutputLengthMismatch => OutputLengthMismatch { .. } => "SUBGRAPH_OUTPUT_LENGTH_MISMATCH",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SubgraphError>;
