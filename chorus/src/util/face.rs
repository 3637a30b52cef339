use glam::IVec3;


/// Represent a cube facing, horizontal faces are also used as growth directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    NegY = 0,
    PosY = 1,
    NegZ = 2,
    PosZ = 3,
    NegX = 4,
    PosX = 5,
}

impl Face {

    /// Array containing all 6 faces.
    pub const ALL: [Self; 6] = [Self::NegY, Self::PosY, Self::NegZ, Self::PosZ, Self::NegX, Self::PosX];
    /// Array containing all 4 horizontal faces.
    pub const HORIZONTAL: [Self; 4] = [Self::NegZ, Self::PosZ, Self::NegX, Self::PosX];
    /// The 4 horizontal faces in clockwise order starting from north, this is the order
    /// used when picking a random horizontal face.
    /// 
    /// PARITY: Notchian server picks from its horizontal plane ordered north, east, 
    /// south, west.
    pub const HORIZONTAL_PLANE: [Self; 4] = [Self::NegZ, Self::PosX, Self::PosZ, Self::NegX];

    #[inline]
    pub fn is_y(self) -> bool {
        matches!(self, Face::NegY | Face::PosY)
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !self.is_y()
    }

    /// Get the opposite face.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Face::NegY => Face::PosY,
            Face::PosY => Face::NegY,
            Face::NegZ => Face::PosZ,
            Face::PosZ => Face::NegZ,
            Face::NegX => Face::PosX,
            Face::PosX => Face::NegX,
        }
    }

    /// Get the delta vector for this face.
    #[inline]
    pub fn delta(self) -> IVec3 {
        match self {
            Face::NegY => IVec3::NEG_Y,
            Face::PosY => IVec3::Y,
            Face::NegZ => IVec3::NEG_Z,
            Face::PosZ => IVec3::Z,
            Face::NegX => IVec3::NEG_X,
            Face::PosX => IVec3::X,
        }
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn horizontal_plane_order() {
        assert_eq!(Face::HORIZONTAL_PLANE[0].delta(), IVec3::NEG_Z);
        assert_eq!(Face::HORIZONTAL_PLANE[1].delta(), IVec3::X);
        for face in Face::HORIZONTAL_PLANE {
            assert!(face.is_horizontal());
            assert!(Face::HORIZONTAL.contains(&face));
        }
    }

    #[test]
    fn opposite_delta_cancels() {
        for face in Face::ALL {
            assert_eq!(face.delta() + face.opposite().delta(), IVec3::ZERO);
            assert_eq!(face.opposite().opposite(), face);
        }
    }

}
