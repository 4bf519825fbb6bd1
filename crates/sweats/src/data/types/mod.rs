pub mod sweat_record;
