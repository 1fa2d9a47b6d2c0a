// Baseball statistics: batting CSV ingestion and batting-average aggregation.

pub mod batting;
