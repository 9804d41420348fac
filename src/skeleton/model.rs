//! Skeletal coordinate models.
//!
//! A model converts between an abstract storage vector and a concrete
//! geometric object. Its storage dimension is a compile-time constant,
//! [`ModelMeta::STORDIM`]; every storage vector tagged with the model has
//! exactly that many entries.
//!
//! Conversions are capabilities: [`ToVec<Obj, S>`] and [`ToObj<Obj, S>`]
//! express, at compile time, which object kinds a model supports. If a model
//! does not implement a conversion for an object kind, that kind is simply not
//! supported; the call does not compile. The requested output type selects the
//! conversion:
//!
//! ```
//! use nalgebra::Vector4;
//! use twine_skeleton::math::affine::{Hypersphere, Point};
//! use twine_skeleton::skeleton::model::{Classic, ToObj};
//!
//! let model = Classic::<3>::default();
//! let stor = Vector4::new(1.0, 2.0, 3.0, 0.5);
//!
//! let center: Point<3> = model.to_obj(&stor).unwrap();
//! let sphere: Hypersphere<3> = model.to_obj(&stor).unwrap();
//! assert_eq!(center.coords()[2], 3.0);
//! assert_eq!(sphere.radius(), 0.5);
//! ```

mod classic;
mod error;
mod projective;

use nalgebra::SVector;

pub use classic::Classic;
pub use error::ConversionError;
pub use projective::{PROJECTIVE_EPSILON, Projective};

/// Storage vector of a model with storage dimension `S`.
pub type Stor<const S: usize> = SVector<f64, S>;

/// Model meta data.
pub trait ModelMeta {
    /// Storage dimension of the model.
    const STORDIM: usize;
}

/// Returns the storage dimension of model `M`, e.g. to size display buffers.
#[must_use]
pub const fn stordim<M: ModelMeta>() -> usize {
    M::STORDIM
}

/// Capability for converting an object into a storage vector.
pub trait ToVec<Obj, const S: usize>: ModelMeta {
    /// Converts `obj` into the storage vector representing it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if `obj` cannot be represented by the model.
    fn to_vec(&self, obj: &Obj) -> Result<Stor<S>, ConversionError>;
}

/// Capability for converting a storage vector into an object.
pub trait ToObj<Obj, const S: usize>: ModelMeta {
    /// Converts a storage vector into the object it represents.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if `vec` does not represent a valid `Obj`.
    fn to_obj(&self, vec: &Stor<S>) -> Result<Obj, ConversionError>;

    /// Converts storage data of unchecked length, e.g. read from a file.
    ///
    /// A slice does not determine `S`, so models that convert for several
    /// storage dimensions (such as [`Classic`]) are called with the trait
    /// named in full:
    ///
    /// ```
    /// use twine_skeleton::math::affine::Hypersphere;
    /// use twine_skeleton::skeleton::model::{Classic, ToObj};
    ///
    /// let model = Classic::<3>::default();
    /// let sphere = ToObj::<Hypersphere<3>, 4>::to_obj_from_slice(&model, &[0.0, 0.0, 1.0, 2.0])
    ///     .unwrap();
    /// assert_eq!(sphere.radius(), 2.0);
    ///
    /// assert!(ToObj::<Hypersphere<3>, 4>::to_obj_from_slice(&model, &[0.0, 1.0]).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::StorageDimension`] if `data` does not have
    /// exactly [`ModelMeta::STORDIM`] entries, or any error of [`ToObj::to_obj`].
    fn to_obj_from_slice(&self, data: &[f64]) -> Result<Obj, ConversionError> {
        if data.len() != Self::STORDIM || data.len() != S {
            return Err(ConversionError::StorageDimension {
                expected: Self::STORDIM,
                found: data.len(),
            });
        }
        self.to_obj(&Stor::<S>::from_column_slice(data))
    }
}
