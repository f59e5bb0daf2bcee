//! Descriptive classifications shared by rooms and room types.

labelled_enum! {
    /// Marketing category of a room or room type.
    pub enum RoomCategory ("category") {
        Standard => "STANDARD",
        Superior => "SUPERIOR",
        Deluxe => "DELUXE",
        Suite => "SUITE",
        Family => "FAMILY",
        Dormitory => "DORMITORY",
    }
}

labelled_enum! {
    pub enum BedType ("bed_type") {
        Single => "SINGLE",
        Double => "DOUBLE",
        Twin => "TWIN",
        Queen => "QUEEN",
        King => "KING",
        Bunk => "BUNK",
    }
}

labelled_enum! {
    /// What a hotel room type looks out on.
    pub enum ViewDirection ("view_direction") {
        Sea => "SEA",
        City => "CITY",
        Garden => "GARDEN",
        Mountain => "MOUNTAIN",
        Pool => "POOL",
        River => "RIVER",
    }
}

labelled_enum! {
    pub enum ImageType ("image_type") {
        Room => "ROOM",
        Bathroom => "BATHROOM",
        View => "VIEW",
        Amenity => "AMENITY",
        Other => "OTHER",
    }
}

impl Default for ImageType {
    fn default() -> Self {
        ImageType::Room
    }
}

labelled_enum! {
    pub enum CancellationPolicyType ("cancellation_policy.type") {
        Flexible => "FLEXIBLE",
        Moderate => "MODERATE",
        Strict => "STRICT",
        NonRefundable => "NON_REFUNDABLE",
    }
}
